use serde::{Deserialize, Serialize};

/// Follow-up reminder interval assigned to every imported application.
pub const DEFAULT_FOLLOW_UP_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkMode {
    Remote,
    Onsite,
    Hybrid,
}

impl WorkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkMode::Remote => "remote",
            WorkMode::Onsite => "onsite",
            WorkMode::Hybrid => "hybrid",
        }
    }
}

/// Pipeline stage of a tracked application, in funnel order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    RecruiterScreening,
    PhoneScreen,
    #[serde(rename = "coding_round_1")]
    CodingRound1,
    #[serde(rename = "coding_round_2")]
    CodingRound2,
    SystemDesign,
    Behavioural,
    HiringManager,
    FinalRound,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    #[cfg(test)]
    pub const ALL: [ApplicationStatus; 11] = [
        ApplicationStatus::Applied,
        ApplicationStatus::RecruiterScreening,
        ApplicationStatus::PhoneScreen,
        ApplicationStatus::CodingRound1,
        ApplicationStatus::CodingRound2,
        ApplicationStatus::SystemDesign,
        ApplicationStatus::Behavioural,
        ApplicationStatus::HiringManager,
        ApplicationStatus::FinalRound,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::RecruiterScreening => "recruiter_screening",
            ApplicationStatus::PhoneScreen => "phone_screen",
            ApplicationStatus::CodingRound1 => "coding_round_1",
            ApplicationStatus::CodingRound2 => "coding_round_2",
            ApplicationStatus::SystemDesign => "system_design",
            ApplicationStatus::Behavioural => "behavioural",
            ApplicationStatus::HiringManager => "hiring_manager",
            ApplicationStatus::FinalRound => "final_round",
            ApplicationStatus::Offer => "offer",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub state: String,
    pub city: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

/// A CSV row after normalization, ready to be handed to the application store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedDraft {
    pub company_name: String,
    pub position: String,
    pub job_type: String,
    pub location: Location,
    /// Always `MM/DD/YYYY`.
    pub date_applied: String,
    /// True when the source date was unreadable and today's date was used instead.
    pub date_defaulted: bool,
    pub work_mode: WorkMode,
    pub status: ApplicationStatus,
    pub salary_range: SalaryRange,
    pub notes: String,
    pub follow_up_days: u32,
    pub is_priority: bool,
}

impl NormalizedDraft {
    pub fn is_complete(&self) -> bool {
        !self.company_name.is_empty() && !self.position.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImportOutcome {
    NoDataRows,
    NoNewEntries,
    FullSuccess,
    PartialSuccess,
    TotalFailure,
}

impl ImportOutcome {
    /// Classifies a finished persistence pass. Only called with at least one attempt.
    pub fn classify(succeeded: usize, failed: usize) -> Self {
        match (succeeded, failed) {
            (_, 0) => ImportOutcome::FullSuccess,
            (0, _) => ImportOutcome::TotalFailure,
            _ => ImportOutcome::PartialSuccess,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ImportOutcome::NoDataRows => "The file has a header row but no applications to import.",
            ImportOutcome::NoNewEntries => {
                "Every application in the file is already tracked. Nothing was imported."
            }
            ImportOutcome::FullSuccess => "All applications were imported successfully.",
            ImportOutcome::PartialSuccess => {
                "Some applications were imported, but others could not be saved."
            }
            ImportOutcome::TotalFailure => "None of the applications could be saved. Please try again.",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportSummary {
    pub staged: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped_duplicate: usize,
    pub skipped_incomplete: usize,
    pub dates_defaulted: usize,
    pub outcome: ImportOutcome,
}

impl ImportSummary {
    /// A summary for a run that stopped before anything was persisted.
    pub fn empty(outcome: ImportOutcome) -> Self {
        Self {
            staged: 0,
            succeeded: 0,
            failed: 0,
            skipped_duplicate: 0,
            skipped_incomplete: 0,
            dates_defaulted: 0,
            outcome,
        }
    }
}
