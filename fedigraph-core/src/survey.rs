use crate::graph::{GraphData, build_graph};
use fedigraph_scanner::error::Result;
use fedigraph_scanner::{
    BlockSeverity, BlockSource, DEFAULT_WORKERS, Instance, ProgressCallback, Surveyor,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Options for configuring a survey run
pub struct SurveyOptions {
    pub workers: usize,
    pub show_progress: bool,
}

impl Default for SurveyOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            show_progress: true,
        }
    }
}

/// Run the whole pipeline: fan the instance set out across the worker pool,
/// collect one outcome per instance, and fold the outcomes into a graph.
///
/// The progress bar ticks once per completed outcome; aggregation does not
/// depend on it firing.
pub async fn execute_survey<S: BlockSource + 'static>(
    source: S,
    instances: &[Instance],
    options: SurveyOptions,
) -> Result<GraphData> {
    let SurveyOptions {
        workers,
        show_progress,
    } = options;

    let progress_bar = if show_progress {
        let pb = ProgressBar::new(instances.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut surveyor = Surveyor::new(source);
    if let Some(ref pb) = progress_bar {
        let pb = pb.clone();
        let callback: ProgressCallback = Arc::new(move |_worker_id, name| {
            pb.inc(1);
            pb.set_message(name);
        });
        surveyor = surveyor.with_progress_callback(callback);
    }

    let outcomes = surveyor.run_all(instances, workers).await?;

    if let Some(pb) = progress_bar {
        pb.finish_with_message("survey complete");
    }

    let answered = outcomes.iter().filter(|o| o.is_success()).count();
    info!(
        "Queried {} instances: {} answered, {} failed",
        outcomes.len(),
        answered,
        outcomes.len() - answered
    );

    Ok(build_graph(instances, &outcomes))
}

/// Render a text summary of a graph in the shape `report` prints.
pub fn generate_survey_report(graph: &GraphData) -> String {
    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Nodes: {}\n", graph.nodes.len()));
    report.push_str(&format!("  Links: {}\n", graph.links.len()));

    let public = graph
        .nodes
        .iter()
        .filter(|n| n.publicly_moderated)
        .count();
    report.push_str(&format!("  Instances with public block lists: {}\n", public));

    let suspends = graph
        .links
        .iter()
        .filter(|l| l.severity == BlockSeverity::Suspend)
        .count();
    report.push_str(&format!("  Suspensions: {}\n", suspends));
    report.push_str(&format!("  Silences: {}\n", graph.links.len() - suspends));
    report.push_str(&format!("  Generated: {}\n", graph.generated_at));

    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    report.push_str("## Top blocking instances\n");
    for (name, count) in top_degrees(graph.links.iter().map(|l| l.source.as_str()), 10) {
        report.push_str(&format!("  {:>5}  {}\n", count, name));
    }

    report.push_str("\n## Most blocked domains\n");
    for (name, count) in top_degrees(graph.links.iter().map(|l| l.target.as_str()), 10) {
        report.push_str(&format!("  {:>5}  {}\n", count, name));
    }

    report
}

fn top_degrees<'a>(names: impl Iterator<Item = &'a str>, limit: usize) -> Vec<(&'a str, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names {
        *counts.entry(name).or_insert(0) += 1;
    }

    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use fedigraph_scanner::{BlockEntry, FetchOutcome};
    use std::future::Future;

    struct CannedSource;

    impl BlockSource for CannedSource {
        fn fetch_blocks(&self, instance: &str) -> impl Future<Output = FetchOutcome> + Send {
            let outcome = if instance == "a.example" {
                FetchOutcome::success(
                    instance,
                    vec![BlockEntry {
                        domain: "b.example".to_string(),
                        severity: BlockSeverity::Suspend,
                        comment: Some("spam".to_string()),
                    }],
                )
            } else {
                FetchOutcome::success(instance, Vec::new())
            };
            async move { outcome }
        }
    }

    #[tokio::test]
    async fn survey_runs_the_whole_pipeline() {
        let instances = vec![
            Instance::new("a.example", 10),
            Instance::new("b.example", 20),
        ];

        let graph = execute_survey(
            CannedSource,
            &instances,
            SurveyOptions {
                workers: 2,
                show_progress: false,
            },
        )
        .await
        .unwrap();

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.links.len(), 1);
        assert_eq!(graph.links[0].source, "a.example");
    }

    #[tokio::test]
    async fn report_ranks_sources_and_targets() {
        let instances = vec![
            Instance::new("a.example", 10),
            Instance::new("b.example", 20),
        ];
        let options = SurveyOptions {
            show_progress: false,
            ..Default::default()
        };

        let graph = execute_survey(CannedSource, &instances, options).await.unwrap();
        let report = generate_survey_report(&graph);

        assert!(report.contains("Nodes: 2"));
        assert!(report.contains("Links: 1"));
        assert!(report.contains("Suspensions: 1"));
        assert!(report.contains("## Top blocking instances"));
        assert!(report.contains("    1  a.example"));
        assert!(report.contains("## Most blocked domains"));
        assert!(report.contains("    1  b.example"));
    }
}
