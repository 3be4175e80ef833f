use std::collections::HashMap;
use tracing::{debug, info};

use crate::domain::{Dataset, MatchRecord, MatchTable, MatchedIds, Table};
use crate::error::{LinkageError, Result};
use crate::observability::metrics::{emit_counter, MetricName};
use crate::pipeline::processing::normalize::NameTransform;

/// Outcome of one matching step
#[derive(Debug, Clone)]
pub struct StepOutput {
    /// Orbis rows still in play, with transformed names
    pub orbis: Table,
    /// Kununu rows still in play, with transformed names
    pub kununu: Table,
    /// Pairs joined in this step
    pub matches: MatchTable,
    /// Input ids plus every id consumed in this step
    pub matched_ids: MatchedIds,
}

/// Match the remaining firms of both tables on equal transformed names.
///
/// Rows whose id is already in `matched_ids` are dropped first. Both tables
/// are then deduplicated on the transformed name keeping the first row, so
/// callers should pre-sort by priority (e.g. review count, descending).
/// The returned tables are filtered and transformed but not deduplicated.
pub fn match_firms(
    orbis: &Table,
    kununu: &Table,
    matched_ids: &MatchedIds,
    transform: &dyn NameTransform,
    label: &str,
) -> Result<StepOutput> {
    expect_dataset(orbis, Dataset::Orbis)?;
    expect_dataset(kununu, Dataset::Kununu)?;

    let orbis = orbis.without_ids(matched_ids).map_names(|n| transform.apply(n));
    let kununu = kununu.without_ids(matched_ids).map_names(|n| transform.apply(n));

    let orbis_unique = orbis.dedup_by_name();
    let kununu_unique = kununu.dedup_by_name();
    debug!(
        "Step '{}': {} of {} Orbis and {} of {} Kununu names are distinct",
        label,
        orbis_unique.len(),
        orbis.len(),
        kununu_unique.len(),
        kununu.len()
    );

    // Inner join, Orbis order first. Equal keys expand combinatorially.
    let mut by_name: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, record) in kununu_unique.iter().enumerate() {
        if record.name.is_empty() {
            continue;
        }
        by_name.entry(record.name.as_str()).or_default().push(idx);
    }

    let mut matches = MatchTable::for_tables(&orbis, &kununu);
    for record in orbis_unique.iter() {
        let Some(hits) = by_name.get(record.name.as_str()) else {
            continue;
        };
        for &idx in hits {
            matches.push(MatchRecord {
                orbis: record.clone(),
                kununu: kununu_unique.records()[idx].clone(),
                match_type: label.to_string(),
            });
        }
    }

    let mut updated_ids = matched_ids.clone();
    updated_ids.extend(matches.ids());

    info!("Number of matches after applying {}: {}", label, matches.len());
    emit_counter(MetricName::MatchStepsRun, 1.0);
    emit_counter(MetricName::MatchRecordsMatched, matches.len() as f64);

    Ok(StepOutput {
        orbis,
        kununu,
        matches,
        matched_ids: updated_ids,
    })
}

fn expect_dataset(table: &Table, expected: Dataset) -> Result<()> {
    if table.dataset() == expected {
        Ok(())
    } else {
        Err(LinkageError::DatasetMismatch {
            expected,
            found: table.dataset(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Record;
    use crate::pipeline::processing::normalize::{preprocess_name, Identity};

    fn orbis_table(rows: &[(&str, &str)]) -> Table {
        let mut table = Table::new(Dataset::Orbis);
        for (id, name) in rows {
            table.push(Record::new(*id, *name));
        }
        table
    }

    fn kununu_table(rows: &[(&str, &str, &str)]) -> Table {
        let mut table = Table::new(Dataset::Kununu);
        for (id, name, reviews) in rows {
            table.push(Record::new(*id, *name).with_field("reviews", *reviews));
        }
        table
    }

    #[test]
    fn test_match_single_pair() {
        let orbis = orbis_table(&[("1", "Acme GmbH")]);
        let kununu = kununu_table(&[("a", "ACME Gmbh", "12")]);

        let out = match_firms(&orbis, &kununu, &MatchedIds::new(), &preprocess_name, "exact").unwrap();

        assert_eq!(out.matches.len(), 1);
        let row = &out.matches.rows()[0];
        assert_eq!(row.match_type, "exact");
        assert_eq!(row.orbis.id, "1");
        assert_eq!(row.kununu.id, "a");
        assert_eq!(row.kununu.value(Dataset::Kununu, "reviews"), Some("12"));
        assert!(out.matched_ids.contains("1"));
        assert!(out.matched_ids.contains("a"));
        assert_eq!(out.matched_ids.len(), 2);
        // inputs are untouched
        assert_eq!(orbis.records()[0].name, "Acme GmbH");
        assert_eq!(out.orbis.records()[0].name, "acme gmbh");
    }

    #[test]
    fn test_dedup_prefers_first_kununu_row() {
        let orbis = orbis_table(&[("1", "acme")]);
        let kununu = kununu_table(&[("a", "acme", "500"), ("b", "acme", "3")]);

        let out = match_firms(&orbis, &kununu, &MatchedIds::new(), &Identity, "exact").unwrap();

        assert_eq!(out.matches.len(), 1);
        assert_eq!(out.matches.rows()[0].kununu.id, "a");
        assert!(!out.matched_ids.contains("b"));
        // the losing duplicate stays available for later steps
        assert_eq!(out.kununu.len(), 2);
    }

    #[test]
    fn test_previously_matched_ids_are_excluded() {
        let orbis = orbis_table(&[("1", "acme"), ("2", "beta")]);
        let kununu = kununu_table(&[("a", "acme", "1"), ("b", "beta", "1")]);
        let matched: MatchedIds = vec!["1", "a"].into_iter().collect();

        let out = match_firms(&orbis, &kununu, &matched, &Identity, "exact").unwrap();

        assert_eq!(out.orbis.len(), 1);
        assert_eq!(out.kununu.len(), 1);
        assert_eq!(out.matches.len(), 1);
        assert_eq!(out.matches.rows()[0].orbis.id, "2");
        assert_eq!(out.matched_ids.len(), 4);
    }

    #[test]
    fn test_empty_names_never_join() {
        let orbis = orbis_table(&[("1", "!!!")]);
        let kununu = kununu_table(&[("a", "???", "1")]);

        let out = match_firms(&orbis, &kununu, &MatchedIds::new(), &preprocess_name, "exact").unwrap();
        assert!(out.matches.is_empty());
        assert!(out.matched_ids.is_empty());
    }

    #[test]
    fn test_swapped_tables_are_rejected() {
        let orbis = orbis_table(&[("1", "acme")]);
        let kununu = kununu_table(&[("a", "acme", "1")]);

        let result = match_firms(&kununu, &orbis, &MatchedIds::new(), &Identity, "exact");
        assert!(matches!(
            result,
            Err(LinkageError::DatasetMismatch {
                expected: Dataset::Orbis,
                found: Dataset::Kununu
            })
        ));
    }
}
