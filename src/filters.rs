//! Filtering, searching, and ordering over serialized objects.
//!
//! These free functions form the listing pipeline: filter by exact field
//! value, search case-insensitively across the configured fields, then
//! sort. They operate on `serde_json::Value` objects so the pipeline stays
//! generic over models, and they are shared verbatim by the interactive
//! and export render paths.

use std::collections::HashMap;

/// Applies field-value filters to a set of serialized objects.
///
/// Objects are included when every filter condition matches exactly.
pub fn apply_filters(
    objects: &[serde_json::Value],
    filters: &HashMap<String, String>,
) -> Vec<serde_json::Value> {
    if filters.is_empty() {
        return objects.to_vec();
    }

    objects
        .iter()
        .filter(|obj| {
            filters.iter().all(|(field, value)| {
                obj.get(field).is_some_and(|v| match v {
                    serde_json::Value::String(s) => s == value,
                    serde_json::Value::Number(n) => n.to_string() == *value,
                    serde_json::Value::Bool(b) => b.to_string() == *value,
                    serde_json::Value::Null => value.is_empty() || value == "null",
                    _ => false,
                })
            })
        })
        .cloned()
        .collect()
}

/// Applies a search query across the given fields.
///
/// Objects are included when any search field contains the query,
/// case-insensitively. An empty query or an empty field list matches
/// everything.
pub fn apply_search(
    objects: &[serde_json::Value],
    search_fields: &[String],
    query: &str,
) -> Vec<serde_json::Value> {
    if query.is_empty() || search_fields.is_empty() {
        return objects.to_vec();
    }

    let query_lower = query.to_lowercase();
    objects
        .iter()
        .filter(|obj| {
            search_fields.iter().any(|field| {
                obj.get(field)
                    .and_then(|v| v.as_str())
                    .is_some_and(|s| s.to_lowercase().contains(&query_lower))
            })
        })
        .cloned()
        .collect()
}

/// Sorts serialized objects by a field, ascending by default.
///
/// Prefix the field name with "-" for descending order. `None` leaves the
/// input order untouched.
pub fn apply_ordering(
    mut objects: Vec<serde_json::Value>,
    ordering: Option<&str>,
) -> Vec<serde_json::Value> {
    let Some(ordering) = ordering else {
        return objects;
    };

    let (field, descending) = ordering
        .strip_prefix('-')
        .map_or((ordering, false), |stripped| (stripped, true));

    objects.sort_by(|a, b| {
        let cmp = compare_json_values(a.get(field), b.get(field));
        if descending {
            cmp.reverse()
        } else {
            cmp
        }
    });
    objects
}

/// Compares two optional JSON values for ordering purposes.
fn compare_json_values(
    a: Option<&serde_json::Value>,
    b: Option<&serde_json::Value>,
) -> std::cmp::Ordering {
    match (a, b) {
        (None, None) => std::cmp::Ordering::Equal,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (Some(_), None) => std::cmp::Ordering::Greater,
        (Some(a), Some(b)) => {
            if let (Some(a_str), Some(b_str)) = (a.as_str(), b.as_str()) {
                a_str.cmp(b_str)
            } else if let (Some(a_num), Some(b_num)) = (a.as_f64(), b.as_f64()) {
                a_num
                    .partial_cmp(&b_num)
                    .unwrap_or(std::cmp::Ordering::Equal)
            } else if let (Some(a_bool), Some(b_bool)) = (a.as_bool(), b.as_bool()) {
                a_bool.cmp(&b_bool)
            } else {
                a.to_string().cmp(&b.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_filters_empty() {
        let objects = vec![
            serde_json::json!({"status": "open"}),
            serde_json::json!({"status": "closed"}),
        ];
        let result = apply_filters(&objects, &HashMap::new());
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_apply_filters_string_match() {
        let objects = vec![
            serde_json::json!({"name": "Alice", "status": "open"}),
            serde_json::json!({"name": "Bob", "status": "closed"}),
            serde_json::json!({"name": "Cleo", "status": "open"}),
        ];
        let mut filters = HashMap::new();
        filters.insert("status".to_string(), "open".to_string());
        let result = apply_filters(&objects, &filters);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_apply_filters_number_and_bool() {
        let objects = vec![
            serde_json::json!({"qty": 3, "active": true}),
            serde_json::json!({"qty": 5, "active": false}),
        ];
        let mut filters = HashMap::new();
        filters.insert("qty".to_string(), "3".to_string());
        assert_eq!(apply_filters(&objects, &filters).len(), 1);

        let mut filters = HashMap::new();
        filters.insert("active".to_string(), "false".to_string());
        assert_eq!(apply_filters(&objects, &filters).len(), 1);
    }

    #[test]
    fn test_apply_filters_multiple_conditions() {
        let objects = vec![
            serde_json::json!({"status": "open", "priority": "high"}),
            serde_json::json!({"status": "open", "priority": "low"}),
            serde_json::json!({"status": "closed", "priority": "high"}),
        ];
        let mut filters = HashMap::new();
        filters.insert("status".to_string(), "open".to_string());
        filters.insert("priority".to_string(), "high".to_string());
        let result = apply_filters(&objects, &filters);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_apply_search_case_insensitive() {
        let objects = vec![
            serde_json::json!({"customer": "Acme Corp"}),
            serde_json::json!({"customer": "Globex"}),
        ];
        let fields = vec!["customer".to_string()];
        let result = apply_search(&objects, &fields, "acme");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["customer"], "Acme Corp");
    }

    #[test]
    fn test_apply_search_multiple_fields() {
        let objects = vec![
            serde_json::json!({"title": "Invoice", "notes": "paid in full"}),
            serde_json::json!({"title": "Quote", "notes": "pending"}),
        ];
        let fields = vec!["title".to_string(), "notes".to_string()];
        assert_eq!(apply_search(&objects, &fields, "paid").len(), 1);
        assert_eq!(apply_search(&objects, &fields, "quote").len(), 1);
    }

    #[test]
    fn test_apply_search_empty_query_matches_all() {
        let objects = vec![serde_json::json!({"title": "x"})];
        let fields = vec!["title".to_string()];
        assert_eq!(apply_search(&objects, &fields, "").len(), 1);
        assert_eq!(apply_search(&objects, &[], "x").len(), 1);
    }

    #[test]
    fn test_apply_ordering_ascending_and_descending() {
        let objects = vec![
            serde_json::json!({"name": "Cleo"}),
            serde_json::json!({"name": "Alice"}),
            serde_json::json!({"name": "Bob"}),
        ];
        let asc = apply_ordering(objects.clone(), Some("name"));
        assert_eq!(asc[0]["name"], "Alice");
        assert_eq!(asc[2]["name"], "Cleo");

        let desc = apply_ordering(objects, Some("-name"));
        assert_eq!(desc[0]["name"], "Cleo");
        assert_eq!(desc[2]["name"], "Alice");
    }

    #[test]
    fn test_apply_ordering_numeric() {
        let objects = vec![
            serde_json::json!({"qty": 30}),
            serde_json::json!({"qty": 4}),
            serde_json::json!({"qty": 12}),
        ];
        let result = apply_ordering(objects, Some("qty"));
        assert_eq!(result[0]["qty"], 4);
        assert_eq!(result[1]["qty"], 12);
        assert_eq!(result[2]["qty"], 30);
    }

    #[test]
    fn test_apply_ordering_none_preserves_order() {
        let objects = vec![
            serde_json::json!({"name": "B"}),
            serde_json::json!({"name": "A"}),
        ];
        let result = apply_ordering(objects.clone(), None);
        assert_eq!(result, objects);
    }

    #[test]
    fn test_compare_missing_values_sort_first() {
        let objects = vec![
            serde_json::json!({"name": "B"}),
            serde_json::json!({}),
            serde_json::json!({"name": "A"}),
        ];
        let result = apply_ordering(objects, Some("name"));
        assert!(result[0].get("name").is_none());
        assert_eq!(result[1]["name"], "A");
        assert_eq!(result[2]["name"], "B");
    }
}
