use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single field value. Rows never carry anything outside this closed set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(f64),
    Date(DateTime<Utc>),
    Text(String),
}

impl Scalar {
    /// Numeric coercion used by every aggregation path: numbers pass through
    /// (non-finite becomes 0), numeric strings parse, everything else is 0.
    pub fn as_number(&self) -> f64 {
        match self.as_number_opt() {
            Some(n) => n,
            None => 0.0,
        }
    }

    /// Numeric interpretation without the zero fallback. Range buckets use
    /// this so that a missing field does not land in the bucket containing 0.
    pub fn as_number_opt(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) if n.is_finite() => Some(*n),
            Scalar::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Stringification used for terms-style bucket keys. Null renders as the
    /// empty string so missing and null values group together.
    pub fn to_key(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => fmt_number(*n),
            Scalar::Date(dt) => dt.to_rfc3339(),
            Scalar::Text(s) => s.clone(),
        }
    }
}

impl From<&serde_json::Value> for Scalar {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Scalar::Null,
            serde_json::Value::Bool(b) => Scalar::Bool(*b),
            serde_json::Value::Number(n) => Scalar::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Scalar::Text(s.clone()),
            // Nested structures are out of the row model; stringify them.
            other => Scalar::Text(other.to_string()),
        }
    }
}

/// Render a float the way a label expects: no trailing `.0` on whole numbers.
pub fn fmt_number(n: f64) -> String {
    if !n.is_finite() {
        return "0".to_string();
    }
    format!("{}", n)
}

/// One flat record: an insertion-ordered mapping from field name to [`Scalar`].
/// Rows are immutable inputs to the engine; nothing here mutates them after
/// construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, Scalar)>,
}

impl Row {
    pub fn new() -> Self {
        Row { fields: Vec::new() }
    }

    /// Insert or replace a field, preserving first-insertion order.
    pub fn set(&mut self, field: impl Into<String>, value: Scalar) {
        let field = field.into();
        match self.fields.iter_mut().find(|(k, _)| *k == field) {
            Some((_, v)) => *v = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.fields.iter().find(|(k, _)| k == field).map(|(_, v)| v)
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Bucket key for a field: missing fields group under the empty string.
    pub fn key_of(&self, field: &str) -> String {
        self.get(field).map(Scalar::to_key).unwrap_or_default()
    }

    /// Coerced numeric value of a field; missing fields coerce to 0.
    pub fn number_of(&self, field: &str) -> f64 {
        self.get(field).map(Scalar::as_number).unwrap_or(0.0)
    }

    /// Build a row from a JSON object. Non-object values yield an empty row.
    pub fn from_json_value(value: &serde_json::Value) -> Self {
        let mut row = Row::new();
        if let serde_json::Value::Object(map) = value {
            for (k, v) in map {
                row.set(k.clone(), Scalar::from(v));
            }
        }
        row
    }
}

impl FromIterator<(String, Scalar)> for Row {
    fn from_iter<T: IntoIterator<Item = (String, Scalar)>>(iter: T) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.set(k, v);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = Row;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of field names to scalar values")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Row, A::Error> {
                let mut row = Row::new();
                while let Some((key, value)) = access.next_entry::<String, Scalar>()? {
                    row.set(key, value);
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

/// Parse a JSON array of objects into rows. Deserializes straight from the
/// text so field order in the document is the order the rows carry.
pub fn rows_from_json(json: &str) -> crate::Result<Vec<Row>> {
    Ok(serde_json::from_str::<Vec<Row>>(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(Scalar::Number(3.5).as_number(), 3.5);
        assert_eq!(Scalar::Text("42".to_string()).as_number(), 42.0);
        assert_eq!(Scalar::Text(" 7.5 ".to_string()).as_number(), 7.5);
        assert_eq!(Scalar::Text("abc".to_string()).as_number(), 0.0);
        assert_eq!(Scalar::Bool(true).as_number(), 0.0);
        assert_eq!(Scalar::Null.as_number(), 0.0);
        assert_eq!(Scalar::Number(f64::NAN).as_number(), 0.0);
    }

    #[test]
    fn test_key_stringification() {
        assert_eq!(Scalar::Text("EU".to_string()).to_key(), "EU");
        assert_eq!(Scalar::Number(10.0).to_key(), "10");
        assert_eq!(Scalar::Number(2.5).to_key(), "2.5");
        assert_eq!(Scalar::Bool(false).to_key(), "false");
        assert_eq!(Scalar::Null.to_key(), "");
    }

    #[test]
    fn test_row_preserves_insertion_order() {
        let mut row = Row::new();
        row.set("zeta", Scalar::Number(1.0));
        row.set("alpha", Scalar::Number(2.0));
        let keys: Vec<_> = row.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_row_set_replaces_in_place() {
        let mut row = Row::new();
        row.set("a", Scalar::Number(1.0));
        row.set("b", Scalar::Number(2.0));
        row.set("a", Scalar::Number(3.0));
        assert_eq!(row.len(), 2);
        assert_eq!(row.number_of("a"), 3.0);
    }

    #[test]
    fn test_rows_from_json() {
        let rows = rows_from_json(r#"[{"region": "EU", "sales": 10}, {"region": "US"}]"#)
            .expect("valid rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key_of("region"), "EU");
        assert_eq!(rows[0].number_of("sales"), 10.0);
        assert_eq!(rows[1].key_of("sales"), "");
    }

    #[test]
    fn test_rows_from_json_rejects_non_array() {
        assert!(rows_from_json(r#"{"region": "EU"}"#).is_err());
    }

    #[test]
    fn test_from_json_value_keeps_document_field_order() {
        let value: serde_json::Value =
            serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        let row = Row::from_json_value(&value);
        let keys: Vec<_> = row.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_rows_from_json_keeps_document_field_order() {
        let rows = rows_from_json(r#"[{"zeta": 1, "alpha": 2}]"#).unwrap();
        let keys: Vec<_> = rows[0].keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }
}
