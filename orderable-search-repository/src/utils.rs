//! Utility functions for the orderable search repository.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::errors::UpstreamError;

/// Format a pricing date the way the customer and supplier services expect it:
/// RFC 3339 in UTC with millisecond precision, e.g. `2024-01-31T10:00:00.000Z`.
pub fn format_as_of_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Reject empty or blank identifiers before they are spliced into a URL.
pub fn validate_id(field_name: &str, value: &str) -> Result<(), UpstreamError> {
    if value.trim().is_empty() {
        return Err(UpstreamError::validation(format!(
            "{} is required",
            field_name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_as_of_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 31, 10, 0, 0).unwrap();
        assert_eq!(format_as_of_date(&date), "2024-01-31T10:00:00.000Z");
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("object_id", "s1p").is_ok());
        assert!(matches!(
            validate_id("object_id", ""),
            Err(UpstreamError::ValidationError(_))
        ));
        assert!(matches!(
            validate_id("object_id", "   "),
            Err(UpstreamError::ValidationError(_))
        ));
    }
}
