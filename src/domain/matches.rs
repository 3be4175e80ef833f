use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{Dataset, Record, Table};
use crate::constants::MATCH_TYPE_COLUMN;

/// Identifiers already consumed by a match.
///
/// Orbis and Kununu ids share one pool, so an id seen on either side is
/// excluded from both tables in later steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchedIds {
    ids: HashSet<String>,
}

impl MatchedIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the id was already present
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(|s| s.as_str())
    }
}

impl<S: Into<String>> FromIterator<S> for MatchedIds {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for MatchedIds {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.ids.extend(iter.into_iter().map(Into::into));
    }
}

/// One Orbis row joined with one Kununu row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub orbis: Record,
    pub kununu: Record,
    /// Label of the normalization step that produced the pair
    pub match_type: String,
}

/// Joined rows from one or more matching steps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchTable {
    orbis_columns: Vec<String>,
    kununu_columns: Vec<String>,
    rows: Vec<MatchRecord>,
}

impl MatchTable {
    /// An empty match table carrying the schemas of both inputs
    pub fn for_tables(orbis: &Table, kununu: &Table) -> Self {
        Self {
            orbis_columns: orbis.columns().to_vec(),
            kununu_columns: kununu.columns().to_vec(),
            rows: Vec::new(),
        }
    }

    /// Row-wise union; columns are merged as an outer union
    pub fn concat(tables: impl IntoIterator<Item = MatchTable>) -> Self {
        let mut combined = MatchTable::default();
        for table in tables {
            combined.append(table);
        }
        combined
    }

    pub fn append(&mut self, other: MatchTable) {
        union_columns(&mut self.orbis_columns, other.orbis_columns);
        union_columns(&mut self.kununu_columns, other.kununu_columns);
        self.rows.extend(other.rows);
    }

    pub fn push(&mut self, row: MatchRecord) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[MatchRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchRecord> {
        self.rows.iter()
    }

    /// Every id consumed by these rows, Orbis side first
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(|r| r.orbis.id.as_str())
            .chain(self.rows.iter().map(|r| r.kununu.id.as_str()))
    }

    /// Output headers: Orbis columns, Kununu columns, then `match_type`.
    /// Names present on both sides get `_x` / `_y` suffixes.
    pub fn headers(&self) -> Vec<String> {
        let mut headers = Vec::with_capacity(self.orbis_columns.len() + self.kununu_columns.len() + 1);
        for column in &self.orbis_columns {
            if self.kununu_columns.contains(column) {
                headers.push(format!("{}_x", column));
            } else {
                headers.push(column.clone());
            }
        }
        for column in &self.kununu_columns {
            if self.orbis_columns.contains(column) {
                headers.push(format!("{}_y", column));
            } else {
                headers.push(column.clone());
            }
        }
        headers.push(MATCH_TYPE_COLUMN.to_string());
        headers
    }

    /// Cell values of a row aligned with `headers()`
    pub fn row_values<'a>(&self, row: &'a MatchRecord) -> Vec<&'a str> {
        let orbis = self
            .orbis_columns
            .iter()
            .map(|c| row.orbis.value(Dataset::Orbis, c).unwrap_or(""));
        let kununu = self
            .kununu_columns
            .iter()
            .map(|c| row.kununu.value(Dataset::Kununu, c).unwrap_or(""));
        orbis
            .chain(kununu)
            .chain(std::iter::once(row.match_type.as_str()))
            .collect()
    }
}

fn union_columns(into: &mut Vec<String>, from: Vec<String>) {
    for column in from {
        if !into.contains(&column) {
            into.push(column);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(orbis_id: &str, kununu_id: &str, label: &str) -> MatchRecord {
        MatchRecord {
            orbis: Record::new(orbis_id, "acme").with_field("city", "Berlin"),
            kununu: Record::new(kununu_id, "acme").with_field("city", "Berlin"),
            match_type: label.to_string(),
        }
    }

    #[test]
    fn test_headers_disambiguate_shared_columns() {
        let mut orbis = Table::new(Dataset::Orbis);
        orbis.push(Record::new("1", "acme").with_field("city", "Berlin"));
        let mut kununu = Table::new(Dataset::Kununu);
        kununu.push(Record::new("a", "acme").with_field("city", "Berlin").with_field("reviews", "4"));

        let mut matches = MatchTable::for_tables(&orbis, &kununu);
        matches.push(sample_row("1", "a", "exact"));

        assert_eq!(
            matches.headers(),
            vec!["id", "orbis_name", "city_x", "kununu_id", "kununu_name", "city_y", "reviews", "match_type"]
        );
        assert_eq!(
            matches.row_values(&matches.rows()[0]),
            vec!["1", "acme", "Berlin", "a", "acme", "Berlin", "", "exact"]
        );
    }

    #[test]
    fn test_concat_is_outer_union() {
        let orbis = Table::new(Dataset::Orbis);
        let mut wide_kununu = Table::new(Dataset::Kununu);
        wide_kununu.push(Record::new("b", "beta").with_field("reviews", "9"));

        let mut first = MatchTable::for_tables(&orbis, &Table::new(Dataset::Kununu));
        first.push(sample_row("1", "a", "exact"));
        let mut second = MatchTable::for_tables(&orbis, &wide_kununu);
        second.push(sample_row("2", "b", "suffixes"));

        let combined = MatchTable::concat(vec![first, second]);
        assert_eq!(combined.len(), 2);
        assert!(combined.headers().contains(&"reviews".to_string()));

        let ids: Vec<&str> = combined.ids().collect();
        assert_eq!(ids, vec!["1", "2", "a", "b"]);
    }

    #[test]
    fn test_matched_ids_pool_both_sides() {
        let mut ids: MatchedIds = vec!["1", "a"].into_iter().collect();
        assert!(ids.contains("1"));
        assert!(ids.contains("a"));
        assert!(!ids.insert("a"));
        ids.extend(vec!["2".to_string()]);
        assert_eq!(ids.len(), 3);
    }
}
