use chrono::NaiveDate;

use crate::import::dates::resolve_date;
use crate::import::models::{
    ApplicationStatus, Location, NormalizedDraft, SalaryRange, WorkMode,
    DEFAULT_FOLLOW_UP_DAYS,
};

/// First matching rule wins. Inputs such as "hybrid, mostly remote" carry more
/// than one cue, so order is part of the contract.
const WORK_MODE_RULES: &[(&[&str], WorkMode)] = &[
    (&["remote", "wfh", "work from home"], WorkMode::Remote),
    (&["onsite", "on-site", "office"], WorkMode::Onsite),
    (&["hybrid"], WorkMode::Hybrid),
];

/// Matched against the underscore-normalized status text, first hit wins.
/// Rejection cues come before "offer" so "offer declined" stays rejected, and
/// "coding_round_2" comes before "coding".
const STATUS_RULES: &[(&str, ApplicationStatus)] = &[
    ("reject", ApplicationStatus::Rejected),
    ("declined", ApplicationStatus::Rejected),
    ("offer", ApplicationStatus::Offer),
    ("final", ApplicationStatus::FinalRound),
    // onsite rounds are tracked as the final stage
    ("onsite", ApplicationStatus::FinalRound),
    ("on_site", ApplicationStatus::FinalRound),
    ("hiring_manager", ApplicationStatus::HiringManager),
    ("manager", ApplicationStatus::HiringManager),
    ("behavio", ApplicationStatus::Behavioural),
    ("system_design", ApplicationStatus::SystemDesign),
    ("coding_round_2", ApplicationStatus::CodingRound2),
    ("round_2", ApplicationStatus::CodingRound2),
    ("second_round", ApplicationStatus::CodingRound2),
    ("coding", ApplicationStatus::CodingRound1),
    ("technical", ApplicationStatus::CodingRound1),
    ("round_1", ApplicationStatus::CodingRound1),
    ("recruiter", ApplicationStatus::RecruiterScreening),
    ("phone", ApplicationStatus::PhoneScreen),
    ("screen", ApplicationStatus::RecruiterScreening),
    ("applied", ApplicationStatus::Applied),
];

pub fn canonicalize_work_mode(raw: &str) -> WorkMode {
    let lower = raw.trim().to_lowercase();
    WORK_MODE_RULES
        .iter()
        .find(|(cues, _)| cues.iter().any(|cue| lower.contains(cue)))
        .map(|(_, mode)| *mode)
        .unwrap_or(WorkMode::Remote)
}

pub fn canonicalize_status(raw: &str) -> ApplicationStatus {
    let key = status_key(raw);
    STATUS_RULES
        .iter()
        .find(|(fragment, _)| key.contains(fragment))
        .map(|(_, status)| *status)
        .unwrap_or(ApplicationStatus::Applied)
}

/// Lowercases and collapses every run of non-alphanumeric characters to `_`.
fn status_key(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    let mut in_separator = false;
    for c in raw.to_lowercase().chars() {
        if c.is_alphanumeric() {
            key.push(c);
            in_separator = false;
        } else if !in_separator {
            key.push('_');
            in_separator = true;
        }
    }
    key
}

/// Builds a draft from the eight positional cells. Missing cells read as empty.
pub fn normalize_row(row: &[String], today: NaiveDate) -> NormalizedDraft {
    let cell = |idx: usize| row.get(idx).map(|s| s.trim()).unwrap_or("");
    let date = resolve_date(cell(5), today);

    NormalizedDraft {
        company_name: cell(0).to_string(),
        position: cell(1).to_string(),
        job_type: cell(2).to_string(),
        location: Location {
            state: cell(3).to_string(),
            city: cell(4).to_string(),
        },
        date_applied: date.canonical(),
        date_defaulted: date.defaulted,
        work_mode: canonicalize_work_mode(cell(6)),
        status: canonicalize_status(cell(7)),
        salary_range: SalaryRange { min: 0.0, max: 0.0 },
        notes: String::new(),
        follow_up_days: DEFAULT_FOLLOW_UP_DAYS,
        is_priority: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_work_mode_cues() {
        assert_eq!(canonicalize_work_mode("Remote"), WorkMode::Remote);
        assert_eq!(canonicalize_work_mode("WFH"), WorkMode::Remote);
        assert_eq!(canonicalize_work_mode("Work From Home"), WorkMode::Remote);
        assert_eq!(canonicalize_work_mode("On-site"), WorkMode::Onsite);
        assert_eq!(canonicalize_work_mode("In office"), WorkMode::Onsite);
        assert_eq!(canonicalize_work_mode("Hybrid"), WorkMode::Hybrid);
    }

    #[test]
    fn test_work_mode_first_rule_wins() {
        assert_eq!(canonicalize_work_mode("Hybrid / mostly remote"), WorkMode::Remote);
        assert_eq!(canonicalize_work_mode("hybrid, 3 days office"), WorkMode::Onsite);
    }

    #[test]
    fn test_work_mode_defaults_to_remote() {
        assert_eq!(canonicalize_work_mode(""), WorkMode::Remote);
        assert_eq!(canonicalize_work_mode("flexible"), WorkMode::Remote);
    }

    #[test]
    fn test_onsite_round_is_final_round() {
        assert_eq!(
            canonicalize_status("Onsite Round Passed"),
            ApplicationStatus::FinalRound
        );
    }

    #[test]
    fn test_status_phrases() {
        assert_eq!(
            canonicalize_status("Recruiter call scheduled"),
            ApplicationStatus::RecruiterScreening
        );
        assert_eq!(
            canonicalize_status("Technical interview"),
            ApplicationStatus::CodingRound1
        );
        assert_eq!(canonicalize_status("Offered!"), ApplicationStatus::Offer);
        assert_eq!(canonicalize_status("Declined"), ApplicationStatus::Rejected);
        assert_eq!(
            canonicalize_status("Offer declined"),
            ApplicationStatus::Rejected
        );
        assert_eq!(
            canonicalize_status("Coding Round 2"),
            ApplicationStatus::CodingRound2
        );
        assert_eq!(
            canonicalize_status("Phone Screen"),
            ApplicationStatus::PhoneScreen
        );
        assert_eq!(
            canonicalize_status("Behavioral"),
            ApplicationStatus::Behavioural
        );
        assert_eq!(
            canonicalize_status("System-Design"),
            ApplicationStatus::SystemDesign
        );
    }

    #[test]
    fn test_status_defaults_to_applied() {
        assert_eq!(canonicalize_status(""), ApplicationStatus::Applied);
        assert_eq!(canonicalize_status("waiting"), ApplicationStatus::Applied);
    }

    #[test]
    fn test_canonical_statuses_map_to_themselves() {
        for status in ApplicationStatus::ALL {
            assert_eq!(canonicalize_status(status.as_str()), status);
        }
    }

    #[test]
    fn test_status_key_collapses_separators() {
        assert_eq!(status_key("Hiring -- Manager"), "hiring_manager");
        assert_eq!(status_key("Round #2"), "round_2");
    }

    #[test]
    fn test_normalize_row_fills_defaults() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let draft = normalize_row(
            &row(&[
                "Acme",
                "Backend Engineer",
                "Full-time",
                "CA",
                "San Francisco",
                "13/02/2024",
                "Hybrid",
                "Phone screen",
            ]),
            today,
        );
        assert_eq!(draft.company_name, "Acme");
        assert_eq!(draft.location.city, "San Francisco");
        assert_eq!(draft.date_applied, "02/13/2024");
        assert!(!draft.date_defaulted);
        assert_eq!(draft.work_mode, WorkMode::Hybrid);
        assert_eq!(draft.status, ApplicationStatus::PhoneScreen);
        assert_eq!(draft.salary_range, SalaryRange { min: 0.0, max: 0.0 });
        assert_eq!(draft.follow_up_days, 7);
        assert!(!draft.is_priority);
        assert!(draft.notes.is_empty());
    }

    #[test]
    fn test_short_row_reads_missing_cells_as_empty() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let draft = normalize_row(&row(&["Acme"]), today);
        assert!(!draft.is_complete());
        assert!(draft.date_defaulted);
        assert_eq!(draft.date_applied, "06/01/2025");
        assert_eq!(draft.status, ApplicationStatus::Applied);
    }
}
