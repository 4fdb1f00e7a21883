//! Update-expression assembly.
//!
//! Pure builder for DynamoDB `SET`/`REMOVE` update expressions. Attribute
//! names that collide with the query language's reserved words are aliased
//! through ExpressionAttributeNames; everything else is referenced directly.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

/// Attribute names that DynamoDB's expression grammar reserves. Any
/// attribute whose lowercase name appears here must be aliased to `#name`.
pub const RESERVED_ATTRIBUTE_NAMES: [&str; 6] =
    ["location", "status", "role", "name", "date", "time"];

/// Builder for a partial-update expression.
///
/// Collects `SET attr = :attr` assignments (and `REMOVE attr` clauses) from
/// the populated fields of an update struct and renders the expression
/// string plus its attribute-name and attribute-value maps.
#[derive(Debug, Default)]
pub struct UpdateExpression {
    assignments: Vec<String>,
    removals: Vec<String>,
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

impl UpdateExpression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `SET attribute = :attribute` assignment.
    pub fn set(&mut self, attribute: &str, value: AttributeValue) {
        let lhs = self.reference(attribute);
        self.assignments.push(format!("{lhs} = :{attribute}"));
        self.values.insert(format!(":{attribute}"), value);
    }

    /// Add an assignment when the value is present.
    pub fn set_opt(&mut self, attribute: &str, value: Option<AttributeValue>) {
        if let Some(value) = value {
            self.set(attribute, value);
        }
    }

    /// Add a `REMOVE attribute` clause.
    pub fn remove(&mut self, attribute: &str) {
        let reference = self.reference(attribute);
        self.removals.push(reference);
    }

    /// True when no assignment or removal has been added.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.removals.is_empty()
    }

    /// Render the expression string.
    pub fn expression(&self) -> String {
        let mut parts = Vec::with_capacity(2);
        if !self.assignments.is_empty() {
            parts.push(format!("SET {}", self.assignments.join(", ")));
        }
        if !self.removals.is_empty() {
            parts.push(format!("REMOVE {}", self.removals.join(", ")));
        }
        parts.join(" ")
    }

    /// The ExpressionAttributeNames map, when any alias was needed.
    pub fn names(&self) -> Option<HashMap<String, String>> {
        if self.names.is_empty() {
            None
        } else {
            Some(self.names.clone())
        }
    }

    /// The ExpressionAttributeValues map.
    pub fn values(&self) -> HashMap<String, AttributeValue> {
        self.values.clone()
    }

    fn reference(&mut self, attribute: &str) -> String {
        if RESERVED_ATTRIBUTE_NAMES.contains(&attribute.to_lowercase().as_str()) {
            let alias = format!("#{attribute}");
            self.names.insert(alias.clone(), attribute.to_string());
            alias
        } else {
            attribute.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_attribute_is_not_aliased() {
        let mut expr = UpdateExpression::new();
        expr.set("email_id", AttributeValue::S("a@b.com".to_string()));

        assert_eq!(expr.expression(), "SET email_id = :email_id");
        assert!(expr.names().is_none());
        assert!(expr.values().contains_key(":email_id"));
    }

    #[test]
    fn test_reserved_attribute_is_aliased() {
        let mut expr = UpdateExpression::new();
        expr.set("location", AttributeValue::S("Pune".to_string()));

        assert_eq!(expr.expression(), "SET #location = :location");
        let names = expr.names().expect("alias expected");
        assert_eq!(names.get("#location"), Some(&"location".to_string()));
    }

    #[test]
    fn test_every_reserved_word_is_aliased() {
        for attribute in RESERVED_ATTRIBUTE_NAMES {
            let mut expr = UpdateExpression::new();
            expr.set(attribute, AttributeValue::S("x".to_string()));

            assert!(
                expr.expression().contains(&format!("#{attribute} = :{attribute}")),
                "{attribute} was not aliased"
            );
        }
    }

    #[test]
    fn test_assignments_keep_insertion_order() {
        let mut expr = UpdateExpression::new();
        expr.set("status", AttributeValue::S("inactive".to_string()));
        expr.set("updated_date", AttributeValue::S("2024-01-15T10:30:00+00:00".to_string()));

        assert_eq!(
            expr.expression(),
            "SET #status = :status, updated_date = :updated_date"
        );
    }

    #[test]
    fn test_remove_clause_renders_after_set() {
        let mut expr = UpdateExpression::new();
        expr.set("status_id", AttributeValue::N("2".to_string()));
        expr.remove("closed_date");

        assert_eq!(
            expr.expression(),
            "SET status_id = :status_id REMOVE closed_date"
        );
    }

    #[test]
    fn test_set_opt_skips_absent_fields() {
        let mut expr = UpdateExpression::new();
        expr.set_opt("name", None);
        expr.set_opt("spoc", Some(AttributeValue::S("Asha".to_string())));

        assert_eq!(expr.expression(), "SET spoc = :spoc");
        assert!(expr.names().is_none());
    }

    #[test]
    fn test_empty_expression() {
        let expr = UpdateExpression::new();
        assert!(expr.is_empty());
        assert_eq!(expr.expression(), "");
    }
}
