//! # exportable-admin
//!
//! Delimited-text export for admin-style changelist views.
//!
//! Register models on an [`AdminSite`](site::AdminSite) with a
//! [`ModelAdmin`](model_admin::ModelAdmin) configuration; every
//! [`ExportFormat`](export::ExportFormat) a model declares becomes one
//! concrete route that renders the same filtered, sorted listing as the
//! interactive page, but as a flat delimited download: the page window is
//! widened to the export ceiling, the body is delimiter-joined text, and
//! the response carries `Content-Type: text/csv` plus a
//! `Content-Disposition: attachment` header with a slugified filename.
//!
//! The interactive changelist advertises its export routes as
//! `export_links`, one button per configured format. Models with no
//! configured formats simply have no export.
//!
//! ```
//! use std::sync::Arc;
//! use exportable_admin::export::ExportFormat;
//! use exportable_admin::model_admin::ModelAdmin;
//! use exportable_admin::site::AdminSite;
//! use exportable_admin::source::InMemorySource;
//!
//! let source = Arc::new(InMemorySource::new());
//! let mut site = AdminSite::new("admin").source(source);
//! site.register(
//!     "shop.order",
//!     ModelAdmin::new("shop", "order")
//!         .list_display(vec!["id", "customer"])
//!         .export_formats(vec![ExportFormat::csv(), ExportFormat::pipe()]),
//! );
//! let router = site.into_router();
//! ```
//!
//! Exports are capped at the admin's `export_queryset_limit` (10,000 rows
//! by default): a larger result set is silently truncated to the ceiling,
//! with only a log warning to show for it. There is no multi-file or
//! streaming mode; the whole body is built in memory within the request.

pub mod changelist;
pub mod error;
pub mod export;
pub mod filters;
pub mod model_admin;
pub mod pagination;
pub mod permissions;
pub mod site;
pub mod source;
pub mod text;

pub use error::AdminError;
pub use export::{ExportFormat, RenderTarget};
pub use model_admin::ModelAdmin;
pub use site::AdminSite;
pub use source::{ChangelistSource, InMemorySource};
