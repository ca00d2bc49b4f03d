//! Table storage shared by the catalog implementations

use super::{Direction, Filter, Order};
use crate::error::{CleanerError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Table {
    next_id: i64,
    rows: Vec<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct Tables {
    tables: BTreeMap<String, Table>,
}

impl Tables {
    pub(crate) fn insert(&mut self, table: &str, record: Value) -> Result<Value> {
        let Value::Object(mut fields) = record else {
            return Err(CleanerError::catalog(table, "records must be JSON objects"));
        };

        let entry = self.tables.entry(table.to_string()).or_default();
        entry.next_id += 1;
        fields.insert("id".to_string(), Value::from(entry.next_id));

        let record = Value::Object(fields);
        entry.rows.push(record.clone());
        Ok(record)
    }

    pub(crate) fn update(&mut self, table: &str, id: i64, fields: Value) -> Result<Value> {
        let Value::Object(fields) = fields else {
            return Err(CleanerError::catalog(table, "update fields must be a JSON object"));
        };

        let row = self
            .tables
            .get_mut(table)
            .and_then(|entry| {
                entry
                    .rows
                    .iter_mut()
                    .find(|row| row.get("id").and_then(Value::as_i64) == Some(id))
            })
            .ok_or_else(|| CleanerError::catalog(table, format!("no record with id {}", id)))?;

        if let Value::Object(existing) = row {
            for (name, value) in fields {
                if name != "id" {
                    existing.insert(name, value);
                }
            }
        }
        Ok(row.clone())
    }

    pub(crate) fn query(&self, table: &str, filters: &[Filter], order: Option<&Order>) -> Vec<Value> {
        let mut rows: Vec<Value> = self
            .tables
            .get(table)
            .map(|entry| {
                entry
                    .rows
                    .iter()
                    .filter(|row| filters.iter().all(|filter| filter.matches(row)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = order {
            rows.sort_by(|a, b| {
                let ordering = compare_values(a.get(&order.field), b.get(&order.field))
                    .then_with(|| compare_values(a.get("id"), b.get("id")));
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }
        rows
    }
}

/// Numbers by value, strings lexically, missing and null values first
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.total_cmp(&b)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}
