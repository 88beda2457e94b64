use serde::{Deserialize, Serialize};

/// Outcome classification for one problem retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProblemStatus {
    Success,
    /// Hard transport failure (unreachable, timeout, body decode).
    NetworkError,
    /// Transient condition (3xx class, redirect loop) where an immediate
    /// re-attempt is expected to succeed.
    Retryable,
    NotExist,
    ParseError,
    /// The requested judge is not in the registry.
    Unsupported,
    /// The problem id failed the judge's structural shape check; no request
    /// was issued.
    InvalidId,
}

impl ProblemStatus {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProblemStatus::NetworkError | ProblemStatus::Retryable)
    }
}

/// One remote problem statement. Constructed fresh per retrieval; the
/// non-status fields are populated only when `status` is `Success`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub remote_oj: String,
    pub remote_id: String,
    pub remote_url: Option<String>,
    pub title: Option<String>,
    pub time_limit: Option<String>,
    pub memory_limit: Option<String>,
    pub special_judge: bool,
    pub html: Option<String>,
    pub status: ProblemStatus,
}

impl Problem {
    pub(crate) fn new(oj: &str, pid: &str, url: &str, status: ProblemStatus) -> Self {
        Problem {
            remote_oj: oj.to_string(),
            remote_id: pid.to_string(),
            remote_url: Some(url.to_string()),
            title: None,
            time_limit: None,
            memory_limit: None,
            special_judge: false,
            html: None,
            status,
        }
    }

    /// Sentinel for a judge name the registry does not know. Carries the
    /// caller's original (non-canonical) name so the absence of support is
    /// itself inspectable.
    pub fn unsupported(origin_name: &str, pid: &str) -> Self {
        Problem {
            remote_oj: origin_name.to_string(),
            remote_id: pid.to_string(),
            remote_url: None,
            title: None,
            time_limit: None,
            memory_limit: None,
            special_judge: false,
            html: None,
            status: ProblemStatus::Unsupported,
        }
    }

    pub(crate) fn invalid_id(oj: &str, pid: &str) -> Self {
        Problem {
            remote_url: None,
            ..Problem::new(oj, pid, "", ProblemStatus::InvalidId)
        }
    }
}

/// Outcome classification for one result poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Success,
    /// No matching submission row. A success-shaped non-error.
    NotExist,
    NetworkError,
    ParseError,
}

/// One submission's outcome at a point in time. Callers re-poll for a fresh
/// instance; an existing one is never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub origin_run_id: Option<String>,
    /// Raw judge-owned verdict text; meaningful only when `status` is
    /// `Success`. Classify it through the judge's verdict predicates.
    pub verdict: Option<String>,
    /// Auxiliary detail, e.g. the failing test number.
    pub verdict_info: Option<String>,
    pub execute_time: Option<String>,
    pub execute_memory: Option<String>,
    pub status: RunStatus,
}

impl RunResult {
    pub(crate) fn with_status(status: RunStatus) -> Self {
        RunResult {
            origin_run_id: None,
            verdict: None,
            verdict_info: None,
            execute_time: None,
            execute_memory: None,
            status,
        }
    }
}

/// Outcome of a code submission. `SpiderError` marks a failure before the
/// submission was posted (login, token fetch) and is safe to retry; the other
/// two are post-submission and terminal, blind resubmission risks a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitStatus {
    Success,
    SubmitError,
    SpiderError,
}

impl SubmitStatus {
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmitStatus::SpiderError)
    }
}
