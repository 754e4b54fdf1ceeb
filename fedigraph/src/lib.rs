// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{load_instances_from_file, parse_instance_line};

// Re-export survey functionality from fedigraph-core
pub use fedigraph_core::survey::{SurveyOptions, execute_survey, generate_survey_report};
