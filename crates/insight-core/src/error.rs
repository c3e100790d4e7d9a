use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InsightError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Check that a percentile cutoff lies in `[0, 1]`.
pub fn check_unit_interval(name: &str, value: f64) -> Result<(), InsightError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(InsightError::InvalidConfig(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

/// Check that a floor/margin is finite and non-negative.
pub fn check_non_negative(name: &str, value: f64) -> Result<(), InsightError> {
    if !value.is_finite() || value < 0.0 {
        return Err(InsightError::InvalidConfig(format!(
            "{} must be a non-negative number, got {}",
            name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_interval_bounds() {
        assert!(check_unit_interval("p", 0.0).is_ok());
        assert!(check_unit_interval("p", 1.0).is_ok());
        assert!(check_unit_interval("p", 1.2).is_err());
        assert!(check_unit_interval("p", f64::NAN).is_err());
    }

    #[test]
    fn test_non_negative_message() {
        let err = check_non_negative("min_views", -5.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid config: min_views must be a non-negative number, got -5"
        );
    }
}
