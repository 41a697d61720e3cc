//! Site registry and router generation.
//!
//! The [`AdminSite`] holds the registered models with their
//! [`ModelAdmin`] configurations and produces an axum router. Beyond the
//! model index and the interactive changelist, every export format
//! configured on a registered model becomes one concrete route under the
//! model's namespace (`/{app}/{model}/export/{format-slug}/`), with its
//! delimiter bound at registration time. Export requests never re-detect
//! their mode from the path; the route itself carries the format.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use http::{header, HeaderMap};
use serde::Serialize;

use crate::changelist::{build_changelist, ChangeList, ChangeListParams};
use crate::error::AdminError;
use crate::export::{
    attachment_disposition, export_links, export_route_name, render_delimited, ExportFormat,
    ExportLink, RenderTarget,
};
use crate::model_admin::ModelAdmin;
use crate::permissions::{change_permission, AccessPolicy, AllowAll};
use crate::source::{ChangelistSource, InMemorySource};

/// The admin site: model registration and route generation.
///
/// # Examples
///
/// ```
/// use exportable_admin::site::AdminSite;
/// use exportable_admin::model_admin::ModelAdmin;
/// use exportable_admin::export::ExportFormat;
///
/// let mut site = AdminSite::new("admin");
/// site.register(
///     "shop.order",
///     ModelAdmin::new("shop", "order").export_format(ExportFormat::csv()),
/// );
/// let router = site.into_router();
/// ```
pub struct AdminSite {
    /// The site name.
    name: String,
    /// The URL prefix used when building links.
    url_prefix: String,
    /// Registered model admin configurations, keyed by `"app.model"`.
    registered_models: HashMap<String, ModelAdmin>,
    /// The data layer behind the changelists.
    source: Option<Arc<dyn ChangelistSource>>,
    /// The access policy guarding the changelists.
    policy: Option<Arc<dyn AccessPolicy>>,
}

impl AdminSite {
    /// Creates a site with the given name.
    ///
    /// The URL prefix defaults to `/admin`; the source defaults to an
    /// empty [`InMemorySource`] and the policy to [`AllowAll`].
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            url_prefix: "/admin".to_string(),
            registered_models: HashMap::new(),
            source: None,
            policy: None,
        }
    }

    /// Sets the URL prefix used in generated links.
    #[must_use]
    pub fn url_prefix(mut self, prefix: &str) -> Self {
        self.url_prefix = prefix.to_string();
        self
    }

    /// Sets the changelist source.
    #[must_use]
    pub fn source(mut self, source: Arc<dyn ChangelistSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the access policy.
    #[must_use]
    pub fn policy(mut self, policy: Arc<dyn AccessPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Returns the site name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the URL prefix.
    pub fn url_prefix_str(&self) -> &str {
        &self.url_prefix
    }

    /// Registers a model with its admin configuration.
    ///
    /// The `model_key` should be in `"app_label.model_name"` format.
    pub fn register(&mut self, model_key: &str, admin: ModelAdmin) {
        self.registered_models.insert(model_key.to_string(), admin);
    }

    /// Unregisters a model.
    pub fn unregister(&mut self, model_key: &str) {
        self.registered_models.remove(model_key);
    }

    /// Returns the `ModelAdmin` for a registered model, if any.
    pub fn get_model_admin(&self, model_key: &str) -> Option<&ModelAdmin> {
        self.registered_models.get(model_key)
    }

    /// Returns whether a model is registered.
    pub fn is_registered(&self, model_key: &str) -> bool {
        self.registered_models.contains_key(model_key)
    }

    /// Returns all registered model keys.
    pub fn registered_models(&self) -> Vec<&str> {
        self.registered_models.keys().map(String::as_str).collect()
    }

    /// Returns the number of registered models.
    pub fn model_count(&self) -> usize {
        self.registered_models.len()
    }

    /// Enumerates the export routes this site will register: one per
    /// configured format per model, in model-key order.
    pub fn export_routes(&self) -> Vec<ExportRoute> {
        let mut keys: Vec<&String> = self.registered_models.keys().collect();
        keys.sort();

        let mut routes = Vec::new();
        for key in keys {
            let admin = &self.registered_models[key];
            for format in &admin.export_formats {
                routes.push(ExportRoute {
                    name: export_route_name(&admin.app_label, &admin.model_name, &format.label),
                    path: format!(
                        "/{}/{}/export/{}/",
                        admin.app_label,
                        admin.model_name,
                        format.slug()
                    ),
                    model_key: admin.model_key(),
                    format: format.clone(),
                });
            }
        }
        routes
    }

    /// Generates the axum router.
    ///
    /// Routes:
    ///
    /// - `GET /` - list registered models grouped by app
    /// - `GET /{app}/{model}/` - the interactive changelist
    /// - `GET /{app}/{model}/export/{format-slug}/` - one per configured
    ///   export format, bound to that format's delimiter
    pub fn into_router(self) -> Router {
        let source: Arc<dyn ChangelistSource> = self
            .source
            .clone()
            .unwrap_or_else(|| Arc::new(InMemorySource::new()));
        let policy: Arc<dyn AccessPolicy> =
            self.policy.clone().unwrap_or_else(|| Arc::new(AllowAll));
        let routes = self.export_routes();

        let shared = Arc::new(AdminSiteState {
            registered_models: self.registered_models,
            url_prefix: self.url_prefix,
            name: self.name,
            source,
            policy,
        });

        // Export routes go in ahead of the capture-based changelist route;
        // their static "export" segment also outranks the captures in the
        // matcher.
        let mut router = Router::new();
        for route in routes {
            let state = Arc::clone(&shared);
            let model_key = route.model_key.clone();
            let format = route.format.clone();
            tracing::debug!(name = %route.name, path = %route.path, "registering export route");
            router = router.route(
                &route.path,
                get(
                    move |headers: HeaderMap, Query(query): Query<HashMap<String, String>>| {
                        let state = Arc::clone(&state);
                        let model_key = model_key.clone();
                        let format = format.clone();
                        async move { handle_export(state, headers, query, model_key, format).await }
                    },
                ),
            );
        }

        router
            .route("/", get(handle_index))
            .route("/{app}/{model}/", get(handle_changelist))
            .with_state(shared)
    }
}

impl std::fmt::Debug for AdminSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSite")
            .field("name", &self.name)
            .field("url_prefix", &self.url_prefix)
            .field("model_count", &self.registered_models.len())
            .finish_non_exhaustive()
    }
}

/// One registered export route.
#[derive(Debug, Clone)]
pub struct ExportRoute {
    /// The deterministic route name.
    pub name: String,
    /// The route path, relative to the router root.
    pub path: String,
    /// The model key the route serves.
    pub model_key: String,
    /// The format bound to the route.
    pub format: ExportFormat,
}

/// Shared state for the handlers.
struct AdminSiteState {
    registered_models: HashMap<String, ModelAdmin>,
    url_prefix: String,
    name: String,
    source: Arc<dyn ChangelistSource>,
    policy: Arc<dyn AccessPolicy>,
}

/// The JSON payload of the interactive changelist.
#[derive(Debug, Clone, Serialize)]
pub struct ChangelistResponse {
    /// The raw objects on this page.
    pub results: Vec<serde_json::Value>,
    /// Total number of matching objects.
    pub count: usize,
    /// The page number rendered.
    pub page: usize,
    /// The page size used.
    pub page_size: usize,
    /// Total number of pages.
    pub total_pages: usize,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_previous: bool,
    /// Column header labels.
    pub columns: Vec<String>,
    /// One "Export as ..." control per configured format.
    pub export_links: Vec<ExportLink>,
}

impl ChangelistResponse {
    fn new(changelist: ChangeList, links: Vec<ExportLink>) -> Self {
        Self {
            results: changelist.results,
            count: changelist.result_count,
            page: changelist.page,
            page_size: changelist.page_size,
            total_pages: changelist.total_pages,
            has_next: changelist.has_next,
            has_previous: changelist.has_previous,
            columns: changelist.headers,
            export_links: links,
        }
    }
}

/// Summary of a registered model in the index payload.
#[derive(Debug, Clone, Serialize)]
struct ModelInfo {
    name: String,
    verbose_name: String,
    verbose_name_plural: String,
    url: String,
}

// ── Handlers ───────────────────────────────────────────────────────

/// Handler for `GET /` - registered models grouped by app label.
async fn handle_index(State(state): State<Arc<AdminSiteState>>) -> impl IntoResponse {
    let mut grouped: BTreeMap<String, Vec<ModelInfo>> = BTreeMap::new();
    for admin in state.registered_models.values() {
        grouped
            .entry(admin.app_label.clone())
            .or_default()
            .push(ModelInfo {
                name: admin.model_name.clone(),
                verbose_name: admin.verbose_name.clone(),
                verbose_name_plural: admin.verbose_name_plural.clone(),
                url: format!(
                    "{}/{}/{}/",
                    state.url_prefix, admin.app_label, admin.model_name
                ),
            });
    }

    let apps: Vec<serde_json::Value> = grouped
        .into_iter()
        .map(|(app_label, mut models)| {
            models.sort_by(|a, b| a.name.cmp(&b.name));
            serde_json::json!({ "app_label": app_label, "models": models })
        })
        .collect();

    axum::Json(serde_json::json!({
        "site_name": state.name,
        "apps": apps,
    }))
}

/// Handler for `GET /{app}/{model}/` - the interactive changelist.
async fn handle_changelist(
    State(state): State<Arc<AdminSiteState>>,
    Path((app, model)): Path<(String, String)>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let key = format!("{app}.{model}");
    let Some(admin) = state.registered_models.get(&key) else {
        return error_response(&AdminError::ModelNotFound(key));
    };
    if let Err(err) = check_access(&state, &headers, admin) {
        return error_response(&err);
    }

    let params = ChangeListParams::from_query(query);
    interactive_listing(&state, admin, &params).await
}

/// Handler for the export routes. The model key and format were bound
/// when the route was registered.
async fn handle_export(
    state: Arc<AdminSiteState>,
    headers: HeaderMap,
    query: HashMap<String, String>,
    model_key: String,
    format: ExportFormat,
) -> Response {
    let Some(admin) = state.registered_models.get(&model_key) else {
        return error_response(&AdminError::ModelNotFound(model_key));
    };
    // Identical gate to the changelist: no separate export permission.
    if let Err(err) = check_access(&state, &headers, admin) {
        return error_response(&err);
    }

    let params = ChangeListParams::from_query(query);
    let target = match format.render_target() {
        Ok(target) => target,
        Err(err) => {
            // Fail closed: render the normal listing rather than emit a
            // stream with an unwritable delimiter.
            tracing::warn!(
                model = %admin.model_key(),
                format = %format.label,
                error = %err,
                "export delimiter unusable, rendering interactive listing"
            );
            return interactive_listing(&state, admin, &params).await;
        }
    };

    tracing::debug!(
        model = %admin.model_key(),
        format = %format.label,
        "rendering delimited export"
    );
    match build_changelist(admin, state.source.as_ref(), &params, &target).await {
        Ok(changelist) => delimited_response(admin, &changelist, &format),
        Err(AdminError::InvalidLookup(field)) => lookup_redirect(&state, admin, &field),
        Err(err) => error_response(&err),
    }
}

// ── Response assembly ──────────────────────────────────────────────

/// Builds the interactive changelist response; shared by the changelist
/// handler and the export fail-closed path.
async fn interactive_listing(
    state: &Arc<AdminSiteState>,
    admin: &ModelAdmin,
    params: &ChangeListParams,
) -> Response {
    match build_changelist(admin, state.source.as_ref(), params, &RenderTarget::Interactive).await {
        Ok(changelist) => {
            let links = export_links(admin, &state.url_prefix);
            axum::Json(ChangelistResponse::new(changelist, links)).into_response()
        }
        Err(AdminError::InvalidLookup(field)) => lookup_redirect(state, admin, &field),
        Err(err) => error_response(&err),
    }
}

/// Builds the delimited download response. The headers are applied once,
/// after the body is fully rendered.
fn delimited_response(admin: &ModelAdmin, changelist: &ChangeList, format: &ExportFormat) -> Response {
    match render_delimited(&changelist.headers, &changelist.rows, format.delimiter) {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    attachment_disposition(&admin.verbose_name),
                ),
            ],
            body,
        )
            .into_response(),
        Err(err) => error_response(&err),
    }
}

/// Redirects to the unparameterized changelist with the error indicator,
/// mirroring how the interactive listing recovers from a bad lookup.
fn lookup_redirect(state: &Arc<AdminSiteState>, admin: &ModelAdmin, field: &str) -> Response {
    tracing::debug!(
        model = %admin.model_key(),
        field,
        "invalid lookup parameter, redirecting to plain changelist"
    );
    Redirect::to(&format!(
        "{}/{}/{}/?e=1",
        state.url_prefix, admin.app_label, admin.model_name
    ))
    .into_response()
}

/// Runs the access policy for a model's changelist or export.
fn check_access(
    state: &Arc<AdminSiteState>,
    headers: &HeaderMap,
    admin: &ModelAdmin,
) -> Result<(), AdminError> {
    let permission = change_permission(&admin.app_label, &admin.model_name);
    if state.policy.has_permission(headers, &permission) {
        Ok(())
    } else {
        Err(AdminError::PermissionDenied(permission))
    }
}

/// Maps an error to its JSON wire representation.
fn error_response(err: &AdminError) -> Response {
    let status = match err {
        AdminError::ModelNotFound(_) => StatusCode::NOT_FOUND,
        AdminError::PermissionDenied(_) => StatusCode::FORBIDDEN,
        AdminError::InvalidLookup(_) => StatusCode::BAD_REQUEST,
        AdminError::UnsupportedDelimiter(_) | AdminError::Source(_) | AdminError::Render(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (
        status,
        axum::Json(serde_json::json!({ "error": err.to_string() })),
    )
        .into_response()
}
