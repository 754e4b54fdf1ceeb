use colored::Colorize;

pub mod directory;
pub mod error;
pub mod export;
pub mod graph;
pub mod survey;

pub use directory::{DIRECTORY_URL, DirectoryClient};
pub use error::{DirectoryError, ExportError};
pub use export::{load_graph, save_graph};
pub use graph::{GraphData, GraphLink, GraphNode, build_graph};
pub use survey::{SurveyOptions, execute_survey, generate_survey_report};

const BANNER: &str = r#"
   __         _ _                    _
  / _|___  __| (_)__ _ _ _ __ _ _ __| |_
 |  _/ -_)/ _` | / _` | '_/ _` | '_ \ ' \
 |_| \___|\__,_|_\__, |_| \__,_| .__/_||_|
                 |___/         |_|
"#;

pub fn print_banner() {
    println!("{}", BANNER.bright_magenta());
    println!(
        "{}",
        "  mapping the public moderation graph of the fediverse"
            .white()
            .dimmed()
    );
    println!();
}
