use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use super::coercion::parse_employee_count;
use super::{Dataset, MatchedIds};
use crate::constants::NOT_AVAILABLE;
use crate::error::{LinkageError, Result};

/// A single company row from either source table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique within its own table only
    pub id: String,
    /// The company name, possibly already normalized
    pub name: String,
    /// Every other column, keyed by header
    pub fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(column.into(), value.into());
        self
    }

    /// Look up a column value, resolving the dataset's id and name columns
    pub fn value(&self, dataset: Dataset, column: &str) -> Option<&str> {
        if column == dataset.id_column() {
            Some(&self.id)
        } else if column == dataset.name_column() {
            Some(&self.name)
        } else {
            self.fields.get(column).map(|v| v.as_str())
        }
    }
}

/// An ordered sequence of records from one dataset.
///
/// Tables are values: every operation that filters or rewrites rows returns
/// a new table and leaves the receiver untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    dataset: Dataset,
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Table {
    /// Create an empty table with only the required columns
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            columns: vec![
                dataset.id_column().to_string(),
                dataset.name_column().to_string(),
            ],
            records: Vec::new(),
        }
    }

    /// Build a table from raw header and row cells.
    ///
    /// Fails when the dataset's id or name column is missing, or when a row
    /// does not have one cell per header.
    pub fn from_rows(dataset: Dataset, headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let position = |column: &str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| LinkageError::MissingColumn {
                    dataset,
                    column: column.to_string(),
                })
        };
        let id_idx = position(dataset.id_column())?;
        let name_idx = position(dataset.name_column())?;

        let mut records = Vec::with_capacity(rows.len());
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != headers.len() {
                return Err(LinkageError::MalformedRow {
                    dataset,
                    row: row_idx + 1,
                    expected: headers.len(),
                    found: row.len(),
                });
            }

            let mut record = Record::new(row[id_idx].clone(), row[name_idx].clone());
            for (idx, (header, cell)) in headers.iter().zip(row).enumerate() {
                if idx != id_idx && idx != name_idx {
                    record.fields.insert(header.clone(), cell);
                }
            }
            records.push(record);
        }

        Ok(Self {
            dataset,
            columns: headers,
            records,
        })
    }

    /// Append a record, widening the column list with any unseen fields
    pub fn push(&mut self, record: Record) {
        for column in record.fields.keys() {
            if !self.columns.iter().any(|c| c == column) {
                self.columns.push(column.clone());
            }
        }
        self.records.push(record);
    }

    pub fn dataset(&self) -> Dataset {
        self.dataset
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    /// Cell values of a record in column order; absent fields are empty
    pub fn row_values<'a>(&self, record: &'a Record) -> Vec<&'a str> {
        self.columns
            .iter()
            .map(|c| record.value(self.dataset, c).unwrap_or(""))
            .collect()
    }

    /// Drop every record whose id has already been matched
    pub fn without_ids(&self, matched: &MatchedIds) -> Self {
        self.filtered(|r| !matched.contains(&r.id))
    }

    /// Rewrite every name with `f`
    pub fn map_names<F>(&self, f: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        Self {
            dataset: self.dataset,
            columns: self.columns.clone(),
            records: self
                .records
                .iter()
                .map(|r| Record {
                    name: f(&r.name),
                    ..r.clone()
                })
                .collect(),
        }
    }

    /// Keep the first record per distinct name, preserving order
    pub fn dedup_by_name(&self) -> Self {
        let mut seen = HashSet::new();
        self.filtered(|r| seen.insert(r.name.clone()))
    }

    /// Stable descending sort on a numeric column.
    ///
    /// Empty and "n.a." cells sort last; any other non-numeric cell is an error.
    pub fn sort_by_numeric_desc(&mut self, column: &str) -> Result<()> {
        if !self.columns.iter().any(|c| c == column) {
            return Err(LinkageError::MissingColumn {
                dataset: self.dataset,
                column: column.to_string(),
            });
        }

        let mut keys = Vec::with_capacity(self.records.len());
        for record in &self.records {
            let key = match record.value(self.dataset, column).map(str::trim) {
                None | Some("") | Some(NOT_AVAILABLE) => None,
                Some(raw) => parse_employee_count(raw)?,
            };
            keys.push(key);
        }

        let mut keyed: Vec<(Option<i64>, Record)> = keys.into_iter().zip(self.records.drain(..)).collect();

        keyed.sort_by(|(a, _), (b, _)| match (a, b) {
            (Some(a), Some(b)) => b.cmp(a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        self.records = keyed.into_iter().map(|(_, r)| r).collect();
        Ok(())
    }

    fn filtered<P>(&self, mut keep: P) -> Self
    where
        P: FnMut(&Record) -> bool,
    {
        Self {
            dataset: self.dataset,
            columns: self.columns.clone(),
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_from_rows_rejects_missing_name_column() {
        let result = Table::from_rows(
            Dataset::Kununu,
            strings(&["kununu_id", "reviews"]),
            vec![strings(&["a", "10"])],
        );

        match result {
            Err(LinkageError::MissingColumn { dataset, column }) => {
                assert_eq!(dataset, Dataset::Kununu);
                assert_eq!(column, "kununu_name");
            }
            other => panic!("expected missing column error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_rows_rejects_short_row() {
        let result = Table::from_rows(
            Dataset::Orbis,
            strings(&["id", "orbis_name", "employees"]),
            vec![strings(&["1", "Acme GmbH", "10"]), strings(&["2", "Beta AG"])],
        );

        assert!(matches!(
            result,
            Err(LinkageError::MalformedRow { row: 2, expected: 3, found: 2, .. })
        ));
    }

    #[test]
    fn test_from_rows_keeps_extra_columns() {
        let table = Table::from_rows(
            Dataset::Orbis,
            strings(&["employees", "id", "orbis_name"]),
            vec![strings(&["1,200", "1", "Acme GmbH"])],
        )
        .unwrap();

        let record = &table.records()[0];
        assert_eq!(record.id, "1");
        assert_eq!(record.name, "Acme GmbH");
        assert_eq!(record.value(Dataset::Orbis, "employees"), Some("1,200"));
        assert_eq!(table.row_values(record), vec!["1,200", "1", "Acme GmbH"]);
    }

    #[test]
    fn test_dedup_keeps_first_seen() {
        let mut table = Table::new(Dataset::Kununu);
        table.push(Record::new("a", "acme").with_field("reviews", "50"));
        table.push(Record::new("b", "beta"));
        table.push(Record::new("c", "acme").with_field("reviews", "3"));

        let deduped = table.dedup_by_name();
        let ids: Vec<&str> = deduped.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        // the receiver is left untouched
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_sort_by_numeric_desc_puts_missing_last() {
        let mut table = Table::new(Dataset::Kununu);
        table.push(Record::new("a", "x").with_field("reviews", "n.a."));
        table.push(Record::new("b", "y").with_field("reviews", "1,500"));
        table.push(Record::new("c", "z").with_field("reviews", ""));
        table.push(Record::new("d", "w").with_field("reviews", "20"));

        table.sort_by_numeric_desc("reviews").unwrap();
        let ids: Vec<&str> = table.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_sort_by_numeric_desc_rejects_garbage() {
        let mut table = Table::new(Dataset::Kununu);
        table.push(Record::new("a", "x").with_field("reviews", "many"));

        assert!(matches!(
            table.sort_by_numeric_desc("reviews"),
            Err(LinkageError::InvalidNumber(_))
        ));
        assert!(matches!(
            table.sort_by_numeric_desc("rating"),
            Err(LinkageError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_without_ids_filters_matched() {
        let mut table = Table::new(Dataset::Orbis);
        table.push(Record::new("1", "acme"));
        table.push(Record::new("2", "beta"));

        let mut matched = MatchedIds::new();
        matched.insert("1");

        let remaining = table.without_ids(&matched);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining.records()[0].id, "2");
    }
}
