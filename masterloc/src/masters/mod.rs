//! Master-table data model
//!
//! A *table* is one logical game-data sheet: an ordered sequence of
//! schema-free *records* keyed by `id`. Records keep their upstream field
//! order so persisted tables stay human-diffable.

pub mod store;

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Record identity within one table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// Extract an identity from a field value. Only integers and strings
    /// qualify.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(RecordId::Int),
            Value::String(s) => Some(RecordId::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => write!(f, "{id}"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

/// One entity occurrence within a table: an ordered mapping of named fields
/// to values. Any field may or may not be present per table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// The record's identity, taken from its `id` field.
    pub fn id(&self) -> Option<RecordId> {
        self.0.get("id").and_then(RecordId::from_value)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Named ordered collection of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub name: String,
    pub records: Vec<Record>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Insertion-ordered index from record id to position. Records without
    /// an id are skipped; on duplicate ids the first occurrence wins.
    pub fn index_by_id(&self) -> IndexMap<RecordId, usize> {
        let mut index = IndexMap::with_capacity(self.records.len());
        for (position, record) in self.records.iter().enumerate() {
            if let Some(id) = record.id() {
                index.entry(id).or_insert(position);
            }
        }
        index
    }

    pub fn get_by_id(&self, id: &RecordId) -> Option<&Record> {
        self.records
            .iter()
            .find(|record| record.id().as_ref() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(fields: Value) -> Record {
        serde_json::from_value(fields).unwrap()
    }

    #[test]
    fn test_record_id_from_number_and_string() {
        assert_eq!(RecordId::from_value(&json!(7)), Some(RecordId::Int(7)));
        assert_eq!(
            RecordId::from_value(&json!("ab")),
            Some(RecordId::Text("ab".into()))
        );
        assert_eq!(RecordId::from_value(&json!(null)), None);
        assert_eq!(RecordId::from_value(&json!([1])), None);
    }

    #[test]
    fn test_record_preserves_field_order() {
        let rec = record(json!({"id": 1, "zeta": "z", "alpha": "a"}));
        let order: Vec<&str> = rec.fields().map(|(k, _)| k.as_str()).collect();
        assert_eq!(order, ["id", "zeta", "alpha"]);
    }

    #[test]
    fn test_index_by_id_keeps_first_occurrence_and_order() {
        let mut table = Table::new("command");
        table.push(record(json!({"id": 3, "name": "c"})));
        table.push(record(json!({"id": 1, "name": "a"})));
        table.push(record(json!({"id": 3, "name": "dup"})));
        table.push(record(json!({"name": "no id"})));

        let index = table.index_by_id();
        let ids: Vec<RecordId> = index.keys().cloned().collect();
        assert_eq!(ids, [RecordId::Int(3), RecordId::Int(1)]);
        assert_eq!(index[&RecordId::Int(3)], 0);
    }
}
