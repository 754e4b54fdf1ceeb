use serde::{Deserialize, Serialize};

/// How severely an instance limits federation with a blocked domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockSeverity {
    Silence,
    Suspend,
}

impl BlockSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockSeverity::Silence => "silence",
            BlockSeverity::Suspend => "suspend",
        }
    }
}

/// One row of a remote instance's `domain_blocks` response.
///
/// Real payloads carry extra fields (`digest`, ...) which are ignored, and
/// `comment` is frequently null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEntry {
    pub domain: String,
    pub severity: BlockSeverity,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// No response within the deadline, or any transport-level failure.
    Timeout,
    /// The instance answered with a non-200 status.
    HttpError,
    /// 200 status but the body was not a JSON array of block entries.
    InvalidBody,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::Timeout => "timeout",
            FailureReason::HttpError => "http_error",
            FailureReason::InvalidBody => "invalid_body",
        }
    }
}

/// The result of querying one instance for its block list.
///
/// Exactly one of these is produced per surveyed instance; fetch failures are
/// carried as data rather than errors so one unreachable peer never aborts
/// the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FetchOutcome {
    Success {
        instance: String,
        blocks: Vec<BlockEntry>,
    },
    Failure {
        instance: String,
        reason: FailureReason,
    },
}

impl FetchOutcome {
    pub fn success(instance: impl Into<String>, blocks: Vec<BlockEntry>) -> Self {
        FetchOutcome::Success {
            instance: instance.into(),
            blocks,
        }
    }

    pub fn failure(instance: impl Into<String>, reason: FailureReason) -> Self {
        FetchOutcome::Failure {
            instance: instance.into(),
            reason,
        }
    }

    /// The name of the instance this outcome belongs to.
    pub fn instance(&self) -> &str {
        match self {
            FetchOutcome::Success { instance, .. } => instance,
            FetchOutcome::Failure { instance, .. } => instance,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }
}
