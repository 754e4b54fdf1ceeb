use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("fedigraph")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("fedigraph")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and progress output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("survey")
                .about(
                    "Query every instance's public block list and assemble the \
                moderation graph.",
                )
                .arg(
                    arg!(-k --"api-key" <KEY>)
                        .required(false)
                        .help("instances.social API key (defaults to $INSTANCES_SOCIAL_API_KEY)"),
                )
                .arg(
                    arg!(-i --"instances-file" <PATH>)
                        .required(false)
                        .help(
                            "Newline-delimited instance hostnames to survey instead of the \
                        directory listing",
                        )
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"cache" <PATH>)
                        .required(false)
                        .help("Where to cache the directory listing")
                        .default_value("~/.config/fedigraph/instances.json"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Where to write the graph JSON")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .default_value("graph.json"),
                )
                .arg(
                    arg!(-t --"threads" <NUM_WORKERS>)
                        .required(false)
                        .help("The number of async worker 'threads' in the worker pool.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("16"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Per-request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"report" "Print a text summary after the survey")
                        .required(false)
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("report")
                .about("Summarize a previously exported graph file")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Graph JSON file to summarize")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .default_value("graph.json"),
                ),
        )
}
