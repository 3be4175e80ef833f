use crate::constants::NOT_AVAILABLE;
use crate::error::{LinkageError, Result};

/// Convert an employee-count style cell to an integer.
///
/// Thousands separators are removed first. The "n.a." sentinel maps to
/// `None`; anything else that is not an integer is an error.
pub fn parse_employee_count(raw: &str) -> Result<Option<i64>> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned == NOT_AVAILABLE {
        return Ok(None);
    }
    cleaned
        .parse::<i64>()
        .map(Some)
        .map_err(|_| LinkageError::InvalidNumber(raw.to_string()))
}
