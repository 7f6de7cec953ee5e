use serde_json::{Map, Value};

/// Equality filter over the top-level fields of a document body.
///
/// An empty filter matches every document. Clauses are combined with AND.
/// Intended for scalar fields; the Postgres backend evaluates clauses with
/// JSONB containment, which treats arrays as subsets rather than equal values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    /// Creates a filter that matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Creates a filter matching documents whose `field` equals `value`.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and_eq(field, value)
    }

    /// Adds another equality clause.
    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    /// Returns true if the filter has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluates the filter against a document body.
    pub fn matches(&self, body: &Value) -> bool {
        self.clauses
            .iter()
            .all(|(field, expected)| body.get(field) == Some(expected))
    }

    /// Returns the filter as a JSON object, one key per clause.
    pub fn to_json(&self) -> Value {
        let object: Map<String, Value> = self.clauses.iter().cloned().collect();
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_filter_matches_everything() {
        let filter = Filter::all();
        assert!(filter.is_empty());
        assert!(filter.matches(&json!({ "id": 1 })));
        assert!(filter.matches(&json!(null)));
    }

    #[test]
    fn eq_matches_field_value() {
        let filter = Filter::eq("id", 7);
        assert!(filter.matches(&json!({ "id": 7, "name": "Rye" })));
        assert!(!filter.matches(&json!({ "id": 8 })));
        assert!(!filter.matches(&json!({ "name": "Rye" })));
    }

    #[test]
    fn clauses_are_combined_with_and() {
        let filter = Filter::eq("customer_id", 3).and_eq("fulfilled_at", Value::Null);
        assert!(filter.matches(&json!({ "customer_id": 3, "fulfilled_at": null })));
        assert!(!filter.matches(&json!({ "customer_id": 3, "fulfilled_at": "2024-01-01" })));
    }

    #[test]
    fn to_json_builds_object() {
        let filter = Filter::eq("id", 1).and_eq("name", "Baguette");
        assert_eq!(filter.to_json(), json!({ "id": 1, "name": "Baguette" }));
    }
}
