//! Export formats, render targets, and delimited-text rendering.
//!
//! An [`ExportFormat`] pairs a display label with a field delimiter. Each
//! format configured on a [`ModelAdmin`] becomes one concrete route and one
//! export button on the interactive changelist. The [`RenderTarget`] chosen
//! at request entry decides whether the assembled changelist is returned as
//! the interactive JSON page or as a flat delimited stream with download
//! headers.

use serde::{Deserialize, Serialize};

use crate::error::AdminError;
use crate::model_admin::ModelAdmin;
use crate::text::slugify;

/// Default ceiling on the number of rows a single export may contain.
pub const DEFAULT_EXPORT_LIMIT: usize = 10_000;

/// A configured export output format: a display label and the field
/// delimiter it writes.
///
/// # Examples
///
/// ```
/// use exportable_admin::export::ExportFormat;
///
/// let csv = ExportFormat::csv();
/// assert_eq!(csv.delimiter, ',');
/// assert_eq!(csv.slug(), "csv");
///
/// let pipe = ExportFormat::pipe();
/// assert_eq!(pipe.delimiter, '|');
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFormat {
    /// The human-readable format name (e.g., "CSV").
    pub label: String,
    /// The character placed between fields.
    pub delimiter: char,
}

impl ExportFormat {
    /// Creates a format with an arbitrary label and delimiter.
    pub fn new(label: impl Into<String>, delimiter: char) -> Self {
        Self {
            label: label.into(),
            delimiter,
        }
    }

    /// Comma-separated values.
    pub fn csv() -> Self {
        Self::new("CSV", ',')
    }

    /// Tab-separated values.
    pub fn tab() -> Self {
        Self::new("Tab Delimited", '\t')
    }

    /// Pipe-separated values.
    pub fn pipe() -> Self {
        Self::new("Pipe", '|')
    }

    /// Returns the URL segment for this format, derived from the label.
    ///
    /// Labels must slug uniquely within one model's format list; two
    /// formats with the same slug would claim the same route.
    pub fn slug(&self) -> String {
        slugify(&self.label)
    }

    /// Resolves the render target this format produces.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::UnsupportedDelimiter`] when the delimiter is
    /// not an ASCII character and therefore cannot be written as a
    /// single-byte field separator. Callers fall back to the interactive
    /// listing rather than emitting malformed output.
    pub fn render_target(&self) -> Result<RenderTarget, AdminError> {
        if self.delimiter.is_ascii() {
            Ok(RenderTarget::Delimited {
                delimiter: self.delimiter,
            })
        } else {
            Err(AdminError::UnsupportedDelimiter(self.delimiter))
        }
    }
}

/// How a changelist request is rendered.
///
/// Decided exactly once when the request enters a handler and threaded
/// through the assembly pipeline; nothing downstream re-detects the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTarget {
    /// The interactive listing page (JSON payload with pagination
    /// metadata and export links).
    Interactive,
    /// A flat delimited download using the given field separator.
    Delimited {
        /// The field separator to write.
        delimiter: char,
    },
}

impl RenderTarget {
    /// Returns whether this target is an export.
    pub const fn is_export(&self) -> bool {
        matches!(self, Self::Delimited { .. })
    }
}

/// An "Export as ..." control shown on the interactive changelist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportLink {
    /// The button label (e.g., "Export CSV").
    pub label: String,
    /// The absolute URL of the export route.
    pub url: String,
    /// The deterministic route name.
    pub name: String,
}

/// Derives the route name for one export format of one model.
///
/// The name is stable across runs and unique per (app, model, label):
/// `"blog_article_export_csv"`, `"blog_article_export_tab_delimited"`.
pub fn export_route_name(app_label: &str, model_name: &str, label: &str) -> String {
    let slug = slugify(label).replace('-', "_");
    format!("{app_label}_{model_name}_export_{slug}")
}

/// Enumerates the export buttons for a model, one per configured format.
///
/// Returns an empty list when the model has no export formats, which
/// disables export for that changelist.
pub fn export_links(admin: &ModelAdmin, url_prefix: &str) -> Vec<ExportLink> {
    admin
        .export_formats
        .iter()
        .map(|format| ExportLink {
            label: format!("Export {}", format.label),
            url: format!(
                "{url_prefix}/{}/{}/export/{}/",
                admin.app_label,
                admin.model_name,
                format.slug()
            ),
            name: export_route_name(&admin.app_label, &admin.model_name, &format.label),
        })
        .collect()
}

/// Builds the export filename from the item type's display name.
///
/// The suffix is always `.csv` regardless of delimiter, matching the
/// download behavior the export has always had.
pub fn attachment_filename(verbose_name: &str) -> String {
    format!("{}.csv", slugify(verbose_name))
}

/// Builds the `Content-Disposition` header value for an export download.
pub fn attachment_disposition(verbose_name: &str) -> String {
    format!("attachment; filename={}", attachment_filename(verbose_name))
}

/// Renders column headers and rows as delimited text.
///
/// One header record, then one record per row, fields joined by
/// `delimiter` and records terminated by `\n`. Quoting is applied only
/// when a field would otherwise be ambiguous (contains the delimiter, a
/// quote, or a line break).
///
/// # Errors
///
/// Returns [`AdminError::UnsupportedDelimiter`] for a non-ASCII delimiter
/// and [`AdminError::Render`] when the underlying writer fails.
pub fn render_delimited(
    headers: &[String],
    rows: &[Vec<String>],
    delimiter: char,
) -> Result<String, AdminError> {
    if !delimiter.is_ascii() {
        return Err(AdminError::UnsupportedDelimiter(delimiter));
    }

    // The csv writer wants a byte; ASCII was checked above.
    let mut buffer = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter as u8)
            .from_writer(&mut buffer);
        writer.write_record(headers)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush().map_err(csv::Error::from)?;
    }

    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
