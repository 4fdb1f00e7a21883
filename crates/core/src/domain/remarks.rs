use chrono::{DateTime, Utc};

/// Appends a timestamped, attributed entry to a remarks log.
///
/// Requirement and profile remarks are append-only: callers never rewrite
/// the existing text, they extend it one line at a time through this
/// function and store the result via a partial update.
pub fn append_remark(
    existing: Option<&str>,
    remark: &str,
    username: &str,
    at: DateTime<Utc>,
) -> String {
    let entry = format!("{} [{}]: {}", at.format("%Y-%m-%d %H:%M"), username, remark);

    match existing {
        Some(log) if !log.trim().is_empty() => format!("{log}\n{entry}"),
        _ => entry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_first_remark_starts_the_log() {
        let log = append_remark(None, "Shared JD with candidate", "priya", at());
        assert_eq!(log, "2024-01-15 10:30 [priya]: Shared JD with candidate");
    }

    #[test]
    fn test_blank_existing_log_is_treated_as_empty() {
        let log = append_remark(Some("   "), "Called candidate", "priya", at());
        assert_eq!(log, "2024-01-15 10:30 [priya]: Called candidate");
    }

    #[test]
    fn test_appending_preserves_existing_entries() {
        let first = append_remark(None, "Shared JD", "priya", at());
        let second = append_remark(Some(&first), "Scheduled interview", "dev", at());

        assert_eq!(
            second,
            "2024-01-15 10:30 [priya]: Shared JD\n2024-01-15 10:30 [dev]: Scheduled interview"
        );
    }
}
