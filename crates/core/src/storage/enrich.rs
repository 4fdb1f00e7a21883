//! The enrichment join for pipeline reads on the key-value backend.
//!
//! The relational backend gets this shape from a single SQL join; the
//! key-value store has no joins, so its adapter fetches the pieces (pipeline
//! rows, the referenced profiles, the status-to-stage lookup) and this pure
//! function assembles them. Keeping the join out of the adapter makes the
//! drop/fallback rules testable without any storage engine.

use std::collections::HashMap;

use crate::domain::{PipelineProfile, ProcessProfile, Profile};

/// Stage label attached when a profile's status has no lookup entry.
pub const UNKNOWN_STAGE: &str = "Unknown";

/// Joins pipeline rows to their profiles and stage labels.
///
/// Rows without a profile_id, and rows whose profile is missing from
/// `profiles`, are dropped: a dangling pipeline row is not an error, it is
/// simply not part of the requirement's visible pipeline.
pub fn enrich_process_profiles(
    rows: Vec<ProcessProfile>,
    profiles: &HashMap<i64, Profile>,
    stages: &HashMap<i64, String>,
) -> Vec<PipelineProfile> {
    rows.into_iter()
        .filter_map(|row| {
            let profile = row.profile_id.and_then(|id| profiles.get(&id))?;
            let stage = stages
                .get(&profile.status)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_STAGE.to_string());

            Some(PipelineProfile {
                id: row.id,
                requirement_id: row.requirement_id,
                recruiter_name: row.recruiter_name,
                actively_working: row.actively_working,
                profile: profile.clone(),
                stage,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ActivelyWorking;
    use chrono::{TimeZone, Utc};

    fn sample_profile(id: i64, status: i64) -> Profile {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        Profile {
            id,
            name: format!("Candidate {id}"),
            email_id: format!("candidate{id}@example.com"),
            phone: "9876543210".to_string(),
            key_skills: "Rust, SQL".to_string(),
            experience_years: Some(4.5),
            current_ctc: None,
            expected_ctc: None,
            notice_period: Some("30 days".to_string()),
            status,
            remarks: None,
            created_date: now,
            updated_date: now,
        }
    }

    fn sample_row(id: i64, requirement_id: i64, profile_id: Option<i64>) -> ProcessProfile {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        ProcessProfile {
            id,
            requirement_id,
            profile_id,
            recruiter_name: "priya".to_string(),
            status: None,
            actively_working: ActivelyWorking::Yes,
            remarks: None,
            created_date: now,
            updated_date: now,
        }
    }

    #[test]
    fn test_stage_attached_from_lookup() {
        let profiles = HashMap::from([(7, sample_profile(7, 3))]);
        let stages = HashMap::from([(3, "Interview".to_string())]);

        let enriched =
            enrich_process_profiles(vec![sample_row(1, 10, Some(7))], &profiles, &stages);

        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].stage, "Interview");
        assert_eq!(enriched[0].profile.id, 7);
        assert_eq!(enriched[0].requirement_id, 10);
    }

    #[test]
    fn test_unknown_stage_fallback() {
        let profiles = HashMap::from([(7, sample_profile(7, 99))]);
        let stages = HashMap::from([(3, "Interview".to_string())]);

        let enriched =
            enrich_process_profiles(vec![sample_row(1, 10, Some(7))], &profiles, &stages);

        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].stage, UNKNOWN_STAGE);
    }

    #[test]
    fn test_row_with_missing_profile_is_dropped() {
        let profiles = HashMap::from([(7, sample_profile(7, 3))]);
        let stages = HashMap::from([(3, "Interview".to_string())]);

        let rows = vec![sample_row(1, 10, Some(7)), sample_row(2, 10, Some(8))];
        let enriched = enrich_process_profiles(rows, &profiles, &stages);

        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].id, 1);
    }

    #[test]
    fn test_row_without_profile_id_is_dropped() {
        let profiles = HashMap::from([(7, sample_profile(7, 3))]);
        let stages = HashMap::new();

        let enriched = enrich_process_profiles(vec![sample_row(1, 10, None)], &profiles, &stages);

        assert!(enriched.is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let enriched = enrich_process_profiles(Vec::new(), &HashMap::new(), &HashMap::new());
        assert!(enriched.is_empty());
    }
}
