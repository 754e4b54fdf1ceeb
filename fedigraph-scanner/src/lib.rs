pub mod client;
pub mod error;
pub mod instance;
pub mod outcome;
pub mod pool;

pub use client::{BlockListClient, BlockSource, DEFAULT_TIMEOUT};
pub use error::SurveyError;
pub use instance::Instance;
pub use outcome::{BlockEntry, BlockSeverity, FailureReason, FetchOutcome};
pub use pool::{DEFAULT_WORKERS, ProgressCallback, Surveyor};
