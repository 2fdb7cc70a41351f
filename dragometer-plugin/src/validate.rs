//! Argument checks shared by every [`Dashboard`](crate::Dashboard) implementation.

use crate::DashboardError;

pub fn plot_id(id: &str) -> Result<(), DashboardError> {
    if id.is_empty() {
        return Err(DashboardError::invalid("plot id must be a non-empty string"));
    }
    Ok(())
}

pub fn subplot_count(count: usize) -> Result<usize, DashboardError> {
    if count == 0 {
        return Err(DashboardError::invalid("count must be >= 1"));
    }
    Ok(count)
}

/// Rejects NaN and infinities, which cannot be placed on an axis.
pub fn finite(name: &str, value: f64) -> Result<f64, DashboardError> {
    if !value.is_finite() {
        return Err(DashboardError::invalid(format!(
            "{name} must be a finite number, got {value}"
        )));
    }
    Ok(value)
}

pub fn non_negative(name: &str, value: f64) -> Result<f64, DashboardError> {
    let value = finite(name, value)?;
    if value < 0.0 {
        return Err(DashboardError::invalid(format!(
            "{name} must be >= 0, got {value}"
        )));
    }
    Ok(value)
}

/// Converts a signed count or index coming over the C ABI.
pub fn unsigned(name: &str, value: i64) -> Result<usize, DashboardError> {
    usize::try_from(value)
        .map_err(|_| DashboardError::invalid(format!("{name} must be >= 0, got {value}")))
}

/// Decodes a UTF-8 string argument coming over the C ABI.
pub fn text<'a>(name: &str, bytes: &'a [u8]) -> Result<&'a str, DashboardError> {
    std::str::from_utf8(bytes)
        .map_err(|_| DashboardError::invalid(format!("{name} must be valid UTF-8")))
}
