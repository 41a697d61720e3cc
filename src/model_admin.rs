//! Per-model listing configuration.
//!
//! [`ModelAdmin`] describes how one model's changelist is assembled:
//! which columns are shown, which fields are searchable and filterable,
//! the default ordering and page size, which export formats the changelist
//! offers, and how many rows an export may carry.
//!
//! Export variants are configuration, not subclasses: a CSV-only model, a
//! pipe-only model, and a multi-format model differ only in the value of
//! [`export_formats`](ModelAdmin::export_formats).

use serde::{Deserialize, Serialize};

use crate::export::{ExportFormat, DEFAULT_EXPORT_LIMIT};

/// Configuration for one model's changelist and export behavior.
///
/// # Examples
///
/// ```
/// use exportable_admin::model_admin::ModelAdmin;
/// use exportable_admin::export::ExportFormat;
///
/// let admin = ModelAdmin::new("shop", "order")
///     .list_display(vec!["id", "customer", "total"])
///     .search_fields(vec!["customer"])
///     .list_per_page(50)
///     .export_formats(vec![ExportFormat::csv(), ExportFormat::pipe()]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelAdmin {
    /// The application label (e.g., "shop").
    pub app_label: String,
    /// The model name in lowercase (e.g., "order").
    pub model_name: String,
    /// The human-readable name; used for the export filename.
    pub verbose_name: String,
    /// The human-readable plural name.
    pub verbose_name_plural: String,
    /// Fields shown as columns, in order. Empty means "derive from the
    /// field schema, or from the objects themselves".
    pub list_display: Vec<String>,
    /// Fields the changelist may be filtered on.
    pub list_filter: Vec<String>,
    /// Fields searched by the search box.
    pub search_fields: Vec<String>,
    /// Default ordering (prefix with "-" for descending).
    pub ordering: Vec<String>,
    /// Page size of the interactive listing.
    pub list_per_page: usize,
    /// Schema information about the model's fields.
    pub fields_schema: Vec<FieldSchema>,
    /// Export formats offered by this changelist, in button order.
    /// Empty disables export.
    pub export_formats: Vec<ExportFormat>,
    /// Page-size ceiling applied when rendering an export. Result sets
    /// larger than this are silently truncated to the first
    /// `export_queryset_limit` rows.
    pub export_queryset_limit: usize,
}

impl ModelAdmin {
    /// Creates a configuration with default settings and export disabled.
    pub fn new(app_label: impl Into<String>, model_name: impl Into<String>) -> Self {
        let model = model_name.into();
        let verbose = model.replace('_', " ");
        let verbose_plural = format!("{verbose}s");
        Self {
            app_label: app_label.into(),
            model_name: model,
            verbose_name: verbose,
            verbose_name_plural: verbose_plural,
            list_display: Vec::new(),
            list_filter: Vec::new(),
            search_fields: Vec::new(),
            ordering: Vec::new(),
            list_per_page: 100,
            fields_schema: Vec::new(),
            export_formats: Vec::new(),
            export_queryset_limit: DEFAULT_EXPORT_LIMIT,
        }
    }

    /// Sets the verbose name.
    #[must_use]
    pub fn verbose_name(mut self, name: impl Into<String>) -> Self {
        self.verbose_name = name.into();
        self
    }

    /// Sets the plural verbose name.
    #[must_use]
    pub fn verbose_name_plural(mut self, name: impl Into<String>) -> Self {
        self.verbose_name_plural = name.into();
        self
    }

    /// Sets the columns of the list view.
    #[must_use]
    pub fn list_display(mut self, fields: Vec<&str>) -> Self {
        self.list_display = fields.into_iter().map(String::from).collect();
        self
    }

    /// Sets the filterable fields.
    #[must_use]
    pub fn list_filter(mut self, fields: Vec<&str>) -> Self {
        self.list_filter = fields.into_iter().map(String::from).collect();
        self
    }

    /// Sets the fields searched by the search box.
    #[must_use]
    pub fn search_fields(mut self, fields: Vec<&str>) -> Self {
        self.search_fields = fields.into_iter().map(String::from).collect();
        self
    }

    /// Sets the default ordering.
    #[must_use]
    pub fn ordering(mut self, fields: Vec<&str>) -> Self {
        self.ordering = fields.into_iter().map(String::from).collect();
        self
    }

    /// Sets the interactive page size.
    #[must_use]
    pub const fn list_per_page(mut self, count: usize) -> Self {
        self.list_per_page = count;
        self
    }

    /// Sets the field schema.
    #[must_use]
    pub fn fields_schema(mut self, schema: Vec<FieldSchema>) -> Self {
        self.fields_schema = schema;
        self
    }

    /// Sets the export formats, replacing any configured before.
    #[must_use]
    pub fn export_formats(mut self, formats: Vec<ExportFormat>) -> Self {
        self.export_formats = formats;
        self
    }

    /// Appends one export format.
    #[must_use]
    pub fn export_format(mut self, format: ExportFormat) -> Self {
        self.export_formats.push(format);
        self
    }

    /// Sets the export page-size ceiling.
    #[must_use]
    pub const fn export_queryset_limit(mut self, limit: usize) -> Self {
        self.export_queryset_limit = limit;
        self
    }

    /// Returns the model key in `"app_label.model_name"` format.
    pub fn model_key(&self) -> String {
        format!("{}.{}", self.app_label, self.model_name)
    }

    /// Returns whether this changelist offers any export format.
    pub fn has_export(&self) -> bool {
        !self.export_formats.is_empty()
    }

    /// Returns whether a query parameter names a field this changelist
    /// can filter on.
    ///
    /// With neither a field schema nor a filter list configured there is
    /// nothing to validate against and every lookup is accepted.
    pub fn is_valid_lookup(&self, field: &str) -> bool {
        if self.fields_schema.is_empty() && self.list_filter.is_empty() {
            return true;
        }
        self.fields_schema.iter().any(|f| f.name == field)
            || self.list_filter.iter().any(|f| f == field)
    }

    /// Returns the column label for a field: the schema label when the
    /// field is known, the raw field name otherwise.
    pub fn column_label(&self, field: &str) -> String {
        self.fields_schema
            .iter()
            .find(|f| f.name == field)
            .map_or_else(|| field.to_string(), |f| f.label.clone())
    }
}

/// Schema information about a single model field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    /// The field name.
    pub name: String,
    /// The field type as a string (e.g., "CharField", "IntegerField").
    pub field_type: String,
    /// Whether this field is the primary key.
    pub primary_key: bool,
    /// Human-readable column label.
    pub label: String,
}

impl FieldSchema {
    /// Creates a schema entry. The label defaults to the field name with
    /// underscores replaced by spaces.
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        let n = name.into();
        let label = n.replace('_', " ");
        Self {
            name: n,
            field_type: field_type.into(),
            primary_key: false,
            label,
        }
    }

    /// Marks this field as the primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Sets the column label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}
