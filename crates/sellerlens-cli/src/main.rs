use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use sellerlens_classifiers::{EngineConfig, ReviewEngine};
use sellerlens_cli::io::{open_input, open_output, read_records, write_jsonl};
use sellerlens_cli::{run_batch, Cli, Commands};
use sellerlens_core::Review;
use std::io::Write;
use std::path::Path;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    match cli.command {
        Commands::Classify {
            input,
            output,
            negatives,
            config,
            metrics,
        } => {
            let handle = if metrics { Some(init_metrics()?) } else { None };
            let engine = build_engine(config.as_deref())?;

            let records = read_records(open_input(&input)?)?;
            info!("Classifying {} reviews from {}", records.len(), input);

            let report = run_batch(&engine, records).await;

            write_jsonl(
                open_output(output.as_deref())?,
                report.rows.iter().map(|(record, result)| record.to_output(result)),
            )?;

            if let Some(path) = &negatives {
                write_jsonl(open_output(Some(path.as_path()))?, &report.negatives)?;
                info!("Wrote {} negative reviews to {}", report.negatives.len(), path.display());
            }

            // Results own stdout when no output file is given
            let mut out: Box<dyn Write> = if output.is_some() {
                Box::new(std::io::stdout())
            } else {
                Box::new(std::io::stderr())
            };

            writeln!(out)?;
            writeln!(out, "Issue summary ({} mentions)", report.summary.total())?;
            write!(out, "{}", report.summary)?;
            writeln!(out)?;
            writeln!(out, "Negative reviews: {}", report.negatives.len())?;
            for negative in &report.negatives {
                writeln!(out, "  [{}] {}", negative.issues, negative.comment)?;
            }

            if let Some(handle) = handle {
                writeln!(out)?;
                write!(out, "{}", handle.render())?;
            }
        }

        Commands::Check {
            comment,
            rating,
            config,
        } => {
            let engine = build_engine(config.as_deref())?;
            let outcome = engine.classify(&Review::new(comment, rating)).await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }

        Commands::Validate { config } => {
            let config = EngineConfig::from_file(&config)
                .with_context(|| format!("invalid configuration {}", config.display()))?;
            let engine = ReviewEngine::from_config(config)?;

            println!(
                "Configuration OK: {} categories, fallback mode {:?}",
                engine.lexicon().categories().len(),
                engine.config().fallback.mode
            );
        }
    }

    Ok(())
}

fn build_engine(config: Option<&Path>) -> Result<ReviewEngine> {
    let config = EngineConfig::load_or_default(config)?;
    Ok(ReviewEngine::from_config(config)?)
}

fn init_logging(verbose: bool, json: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("sellerlens=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sellerlens=info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Install the Prometheus recorder and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!("sellerlens_reviews_total", "Total number of reviews classified");
    metrics::describe_counter!(
        "sellerlens_fallback_calls_total",
        "Total number of fallback classifier calls"
    );
    metrics::describe_counter!(
        "sellerlens_fallback_failures_total",
        "Fallback classifier failures by reason"
    );
    metrics::describe_histogram!(
        "sellerlens_classify_latency_us",
        metrics::Unit::Microseconds,
        "Per-review classification latency in microseconds"
    );

    Ok(handle)
}
