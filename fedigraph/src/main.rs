use clap::ArgMatches;
use colored::Colorize;
use commands::command_argument_builder;
use fedigraph::handlers::load_instances_from_file;
use fedigraph_core::directory::DirectoryClient;
use fedigraph_core::export::{load_graph, save_graph};
use fedigraph_core::print_banner;
use fedigraph_core::survey::{SurveyOptions, execute_survey, generate_survey_report};
use fedigraph_scanner::{BlockListClient, Instance};
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    match chosen_command.subcommand() {
        Some(("survey", primary_command)) => handle_survey(primary_command, quiet).await,
        Some(("report", primary_command)) => handle_report(primary_command),
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

async fn handle_survey(sub_matches: &ArgMatches, quiet: bool) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let threads = sub_matches.get_one::<usize>("threads").unwrap_or(&16);
    let timeout = sub_matches.get_one::<u64>("timeout").unwrap_or(&10);
    let output = sub_matches.get_one::<PathBuf>("output").unwrap();
    let report_wanted = sub_matches.get_flag("report");

    let instances = match load_instances(sub_matches, quiet).await {
        Ok(instances) => instances,
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            std::process::exit(1);
        }
    };

    println!(
        "\nSurveying {} instances ({} workers, {}s timeout)\n",
        instances.len(),
        threads,
        timeout
    );

    let client = BlockListClient::with_settings(Duration::from_secs(*timeout), *threads);
    let options = SurveyOptions {
        workers: *threads,
        show_progress: !quiet,
    };

    match execute_survey(client, &instances, options).await {
        Ok(graph) => {
            if let Err(e) = save_graph(&graph, output) {
                eprintln!("{} Failed to write {}: {}", "✗".red(), output.display(), e);
                std::process::exit(1);
            }

            println!(
                "\n{} Wrote {} nodes and {} links to {}",
                "✓".green(),
                graph.nodes.len(),
                graph.links.len(),
                output.display()
            );

            if report_wanted {
                print!("{}", generate_survey_report(&graph));
            }
        }
        Err(e) => {
            eprintln!("{} Survey failed: {}", "✗".red(), e);
            std::process::exit(1);
        }
    }
}

/// Resolve the instance set: an explicit hosts file wins, otherwise the
/// directory listing (cached on disk between runs).
async fn load_instances(sub_matches: &ArgMatches, quiet: bool) -> Result<Vec<Instance>, String> {
    if let Some(path) = sub_matches.get_one::<PathBuf>("instances-file") {
        return load_instances_from_file(path);
    }

    let api_key = sub_matches
        .get_one::<String>("api-key")
        .cloned()
        .or_else(|| env::var("INSTANCES_SOCIAL_API_KEY").ok())
        .ok_or_else(|| {
            "No instance source: pass --instances-file, or set --api-key / \
             $INSTANCES_SOCIAL_API_KEY"
                .to_string()
        })?;

    let cache = sub_matches.get_one::<String>("cache").unwrap();
    let cache = shellexpand::tilde(cache).into_owned();

    let spinner = if quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Fetching instance directory...");
        Some(pb)
    };

    let result = DirectoryClient::new(api_key)
        .load_or_fetch(Path::new(&cache))
        .await
        .map_err(|e| format!("Failed to load instance directory: {}", e));

    if let Some(pb) = spinner {
        match &result {
            Ok(instances) => {
                pb.finish_with_message(format!("Directory ready: {} instances", instances.len()))
            }
            Err(_) => pb.finish_and_clear(),
        }
    }

    result
}

fn handle_report(sub_matches: &ArgMatches) {
    let path = sub_matches.get_one::<PathBuf>("PATH").unwrap();

    match load_graph(path) {
        Ok(graph) => print!("{}", generate_survey_report(&graph)),
        Err(e) => {
            eprintln!("{} Failed to load {}: {}", "✗".red(), path.display(), e);
            std::process::exit(1);
        }
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
