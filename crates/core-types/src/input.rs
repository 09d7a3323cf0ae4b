use crate::error::CoreError;

/// Parses a user-supplied share count.
///
/// The count must be a whole, strictly positive number. Fractional, zero,
/// negative, and non-numeric input is rejected, matching the trade forms'
/// contract: `"10"` is ten shares, `"1.5"` and `"-3"` are errors.
pub fn parse_share_count(raw: &str) -> Result<i64, CoreError> {
    let trimmed = raw.trim();
    let shares: i64 = trimmed.parse().map_err(|_| {
        CoreError::InvalidInput(
            "shares".to_string(),
            format!("'{trimmed}' is not a whole number of shares"),
        )
    })?;

    if shares <= 0 {
        return Err(CoreError::InvalidInput(
            "shares".to_string(),
            "share count must be a positive number".to_string(),
        ));
    }

    Ok(shares)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_whole_numbers() {
        assert_eq!(parse_share_count("10").unwrap(), 10);
        assert_eq!(parse_share_count(" 3 ").unwrap(), 3);
        assert_eq!(parse_share_count("1").unwrap(), 1);
    }

    #[test]
    fn rejects_zero_and_negatives() {
        assert!(parse_share_count("0").is_err());
        assert!(parse_share_count("-5").is_err());
    }

    #[test]
    fn rejects_fractional_and_garbage() {
        assert!(parse_share_count("1.5").is_err());
        assert!(parse_share_count("ten").is_err());
        assert!(parse_share_count("").is_err());
        assert!(parse_share_count("1e3").is_err());
    }
}
