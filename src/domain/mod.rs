// Domain data shapes shared across layers

pub mod coercion;
pub mod matches;
pub mod table;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{KUNUNU_ID_COLUMN, KUNUNU_NAME_COLUMN, ORBIS_ID_COLUMN, ORBIS_NAME_COLUMN};

pub use coercion::parse_employee_count;
pub use matches::{MatchRecord, MatchTable, MatchedIds};
pub use table::{Record, Table};

/// The two source tables being linked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    /// Business-registry records
    Orbis,
    /// Employer-review site records
    Kununu,
}

impl Dataset {
    pub fn id_column(&self) -> &'static str {
        match self {
            Dataset::Orbis => ORBIS_ID_COLUMN,
            Dataset::Kununu => KUNUNU_ID_COLUMN,
        }
    }

    pub fn name_column(&self) -> &'static str {
        match self {
            Dataset::Orbis => ORBIS_NAME_COLUMN,
            Dataset::Kununu => KUNUNU_NAME_COLUMN,
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::Orbis => write!(f, "Orbis"),
            Dataset::Kununu => write!(f, "Kununu"),
        }
    }
}
