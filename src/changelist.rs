//! Changelist assembly.
//!
//! A [`ChangeList`] is one rendered page of a model's listing: filtered,
//! searched, ordered, and windowed. It is built once per request from the
//! decoded [`ChangeListParams`] and the [`RenderTarget`] chosen at entry,
//! then discarded with the response.
//!
//! The render target decides the page window *before* anything is
//! materialized into the page: a delimited render widens the window to the
//! admin's export ceiling (orphans 0, empty first page allowed) so the
//! whole practical result set lands on page one, while the interactive
//! render keeps the configured page size. Everything upstream of the
//! window (filters, search, ordering) is identical for both targets.

use std::collections::{BTreeSet, HashMap};

use crate::error::AdminError;
use crate::export::RenderTarget;
use crate::filters::{apply_filters, apply_ordering, apply_search};
use crate::model_admin::ModelAdmin;
use crate::pagination::Paginator;
use crate::source::ChangelistSource;

/// Decoded query parameters for a changelist request.
///
/// Every query pair that is not one of the reserved keys (`page`,
/// `search`, `ordering`, and the `e` error indicator) is treated as a
/// field filter.
#[derive(Debug, Clone, Default)]
pub struct ChangeListParams {
    /// The requested page (1-indexed).
    pub page: usize,
    /// The search query, if any.
    pub search: Option<String>,
    /// The ordering field, if any (prefix with "-" for descending).
    pub ordering: Option<String>,
    /// Field-value filters.
    pub filters: HashMap<String, String>,
}

impl ChangeListParams {
    /// Creates parameters for the first page with no filters.
    pub fn new() -> Self {
        Self {
            page: 1,
            search: None,
            ordering: None,
            filters: HashMap::new(),
        }
    }

    /// Decodes parameters from raw query pairs.
    pub fn from_query(mut query: HashMap<String, String>) -> Self {
        let page = query
            .remove("page")
            .and_then(|p| p.parse().ok())
            .unwrap_or(1);
        let search = query.remove("search").filter(|s| !s.is_empty());
        let ordering = query.remove("ordering").filter(|s| !s.is_empty());
        // "e" is the error indicator added by a lookup redirect, not a filter.
        query.remove("e");
        Self {
            page,
            search,
            ordering,
            filters: query,
        }
    }

    /// Sets the page number.
    #[must_use]
    pub const fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Sets the search query.
    #[must_use]
    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    /// Sets the ordering field.
    #[must_use]
    pub fn ordering(mut self, field: impl Into<String>) -> Self {
        self.ordering = Some(field.into());
        self
    }

    /// Adds a field filter.
    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }
}

/// One rendered page of a model's listing.
#[derive(Debug, Clone)]
pub struct ChangeList {
    /// The fields shown as columns, in order.
    pub fields: Vec<String>,
    /// The column header labels, parallel to `fields`.
    pub headers: Vec<String>,
    /// Stringified cell values, one inner vector per result row.
    pub rows: Vec<Vec<String>>,
    /// The raw objects on this page.
    pub results: Vec<serde_json::Value>,
    /// Total number of matching objects across all pages.
    pub result_count: usize,
    /// The page number rendered (1-indexed).
    pub page: usize,
    /// The page size used for windowing.
    pub page_size: usize,
    /// Total number of pages at this page size.
    pub total_pages: usize,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_previous: bool,
}

/// Builds the changelist for one request.
///
/// # Errors
///
/// Returns [`AdminError::InvalidLookup`] when a filter names a field the
/// admin cannot filter on (handlers redirect to the unparameterized
/// listing), or whatever error the source produced.
pub async fn build_changelist(
    admin: &ModelAdmin,
    source: &dyn ChangelistSource,
    params: &ChangeListParams,
    target: &RenderTarget,
) -> Result<ChangeList, AdminError> {
    for field in params.filters.keys() {
        if !admin.is_valid_lookup(field) {
            return Err(AdminError::InvalidLookup(field.clone()));
        }
    }

    let objects = source.objects(admin).await?;
    let filtered = apply_filters(&objects, &params.filters);
    let searched = match &params.search {
        Some(query) => apply_search(&filtered, &admin.search_fields, query),
        None => filtered,
    };
    let ordering = params
        .ordering
        .as_deref()
        .or_else(|| admin.ordering.first().map(String::as_str));
    let ordered = apply_ordering(searched, ordering);

    // The window must be settled before pagination materializes the page.
    let per_page = match target {
        RenderTarget::Delimited { .. } => admin.export_queryset_limit,
        RenderTarget::Interactive => admin.list_per_page,
    };
    if target.is_export() && ordered.len() > per_page {
        tracing::warn!(
            model = %admin.model_key(),
            count = ordered.len(),
            limit = per_page,
            "export result set exceeds the configured ceiling; output is capped"
        );
    }

    let paginator = Paginator::new(ordered, per_page)
        .orphans(0)
        .allow_empty_first_page(true);
    let number = if target.is_export() { 1 } else { params.page };
    let page = paginator.get_page(number);

    let fields = display_fields(admin, page.object_list());
    let headers = result_headers(admin, &fields);
    let rows = result_rows(&fields, page.object_list());

    Ok(ChangeList {
        result_count: paginator.count(),
        page: page.number(),
        page_size: per_page,
        total_pages: page.num_pages(),
        has_next: page.has_next(),
        has_previous: page.has_previous(),
        fields,
        headers,
        rows,
        results: page.into_object_list(),
    })
}

/// Resolves the fields shown as columns.
///
/// `list_display` wins when configured; otherwise the field schema order
/// is used; failing both, the sorted union of keys across the rendered
/// objects.
pub fn display_fields(admin: &ModelAdmin, objects: &[serde_json::Value]) -> Vec<String> {
    if !admin.list_display.is_empty() {
        return admin.list_display.clone();
    }
    if !admin.fields_schema.is_empty() {
        return admin.fields_schema.iter().map(|f| f.name.clone()).collect();
    }
    let mut keys: BTreeSet<String> = BTreeSet::new();
    for obj in objects {
        if let Some(map) = obj.as_object() {
            for key in map.keys() {
                keys.insert(key.clone());
            }
        }
    }
    keys.into_iter().collect()
}

/// Maps column fields to their header labels.
pub fn result_headers(admin: &ModelAdmin, fields: &[String]) -> Vec<String> {
    fields.iter().map(|f| admin.column_label(f)).collect()
}

/// Stringifies the given fields of each object into table rows.
pub fn result_rows(fields: &[String], objects: &[serde_json::Value]) -> Vec<Vec<String>> {
    objects
        .iter()
        .map(|obj| fields.iter().map(|f| cell_text(obj.get(f))).collect())
        .collect()
}

/// Converts one JSON value into the text placed in a cell.
fn cell_text(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
