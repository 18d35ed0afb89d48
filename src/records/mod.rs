//! Completed records and the in-memory table that holds them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{FormError, Result};

/// Field name to raw string value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, String>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Copies every entry of `other` over this record. Keys absent from
    /// `other` keep their current value.
    pub fn merge(&mut self, other: &Record) {
        for (name, value) in &other.0 {
            self.0.insert(name.clone(), value.clone());
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A committed record with a stable identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: Uuid,
    pub values: Record,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Row {
    pub fn new(values: Record) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            values,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Ordered store of completed rows. Removing a row shifts every later row
/// down by one position; ids never change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordTable {
    rows: Vec<Row>,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new row and returns its position.
    pub fn append(&mut self, record: Record) -> usize {
        let row = Row::new(record);
        tracing::debug!(row_id = %row.id, "row appended");
        self.rows.push(row);
        self.rows.len() - 1
    }

    /// Overwrites the keys present in `partial`; other columns are untouched.
    pub fn update_at(&mut self, index: usize, partial: &Record) -> Result<()> {
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(FormError::IndexOutOfRange { index, len })?;
        row.values.merge(partial);
        row.touch();
        tracing::debug!(row_id = %row.id, index, "row updated");
        Ok(())
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Row> {
        self.check_index(index)?;
        let row = self.rows.remove(index);
        tracing::debug!(row_id = %row.id, index, "row removed");
        Ok(row)
    }

    pub fn row_at(&self, index: usize) -> Result<&Row> {
        self.rows.get(index).ok_or(FormError::IndexOutOfRange {
            index,
            len: self.rows.len(),
        })
    }

    pub fn all_rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn position_of(&self, id: Uuid) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.rows.len() {
            Ok(())
        } else {
            Err(FormError::IndexOutOfRange {
                index,
                len: self.rows.len(),
            })
        }
    }
}
