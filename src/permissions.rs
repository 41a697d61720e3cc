//! Access control pass-through.
//!
//! The changelist does not implement authentication; it asks a host-owned
//! [`AccessPolicy`] whether a request may view a model's listing. Export
//! routes ask for exactly the same `change` permission as the interactive
//! page, so denial looks identical whichever route was requested.

use std::collections::HashSet;

use http::HeaderMap;

/// Builds the permission string guarding a model's changelist and its
/// export routes: `"{app_label}.change_{model_name}"`.
pub fn change_permission(app_label: &str, model_name: &str) -> String {
    format!("{app_label}.change_{model_name}")
}

/// Decides whether a request holds a permission.
///
/// Implementations read whatever evidence the host attaches to the
/// request (session cookies, bearer tokens) from the headers.
pub trait AccessPolicy: Send + Sync {
    /// Returns `true` when the request holds the given permission.
    fn has_permission(&self, headers: &HeaderMap, permission: &str) -> bool;
}

/// Policy that grants every permission. The default for sites that leave
/// authorization to an outer layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessPolicy for AllowAll {
    fn has_permission(&self, _headers: &HeaderMap, _permission: &str) -> bool {
        true
    }
}

/// Policy backed by a fixed permission set, ignoring request headers.
///
/// Useful in tests and in deployments where authorization is decided at
/// site-construction time.
///
/// # Examples
///
/// ```
/// use exportable_admin::permissions::{AccessPolicy, StaticPolicy, change_permission};
/// use http::HeaderMap;
///
/// let policy = StaticPolicy::new().grant(change_permission("shop", "order"));
/// let headers = HeaderMap::new();
/// assert!(policy.has_permission(&headers, "shop.change_order"));
/// assert!(!policy.has_permission(&headers, "shop.change_invoice"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticPolicy {
    granted: HashSet<String>,
}

impl StaticPolicy {
    /// Creates a policy that grants nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants a permission.
    #[must_use]
    pub fn grant(mut self, permission: impl Into<String>) -> Self {
        self.granted.insert(permission.into());
        self
    }
}

impl AccessPolicy for StaticPolicy {
    fn has_permission(&self, _headers: &HeaderMap, permission: &str) -> bool {
        self.granted.contains(permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_permission_format() {
        assert_eq!(change_permission("shop", "order"), "shop.change_order");
    }

    #[test]
    fn test_allow_all() {
        let headers = HeaderMap::new();
        assert!(AllowAll.has_permission(&headers, "anything.change_at_all"));
    }

    #[test]
    fn test_static_policy_grant_and_deny() {
        let policy = StaticPolicy::new()
            .grant("shop.change_order")
            .grant("shop.change_invoice");
        let headers = HeaderMap::new();
        assert!(policy.has_permission(&headers, "shop.change_order"));
        assert!(policy.has_permission(&headers, "shop.change_invoice"));
        assert!(!policy.has_permission(&headers, "shop.change_customer"));
    }

    #[test]
    fn test_static_policy_default_denies_everything() {
        let policy = StaticPolicy::new();
        let headers = HeaderMap::new();
        assert!(!policy.has_permission(&headers, "shop.change_order"));
    }

    #[test]
    fn test_policy_is_object_safe() {
        fn assert_object_safe(_: &dyn AccessPolicy) {}
        assert_object_safe(&AllowAll);
        assert_object_safe(&StaticPolicy::new());
    }
}
