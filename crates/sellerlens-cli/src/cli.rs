use clap::{Parser, Subcommand};
use sellerlens_core::Rating;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sellerlens")]
#[command(
    author,
    version,
    about = "Issue and sentiment classification for seller reviews"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a JSON Lines file of reviews
    Classify {
        /// Input file with one {"comment", "rating_type"} object per line ("-" for stdin)
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Write result records here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also export the negative reviews to this file
        #[arg(long)]
        negatives: Option<PathBuf>,

        /// Engine configuration file
        #[arg(short, long, env = "SELLERLENS_CONFIG")]
        config: Option<PathBuf>,

        /// Print Prometheus metrics after the batch
        #[arg(long)]
        metrics: bool,
    },

    /// Classify a single review and print the outcome as JSON
    Check {
        /// Review text
        #[arg(long)]
        comment: String,

        /// Rating bucket: positive, neutral or negative
        #[arg(long, value_parser = parse_rating)]
        rating: Rating,

        /// Engine configuration file
        #[arg(short, long, env = "SELLERLENS_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Load a configuration and its lexicon, reporting any error
    Validate {
        /// Engine configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn parse_rating(s: &str) -> Result<Rating, String> {
    s.parse().map_err(|e: sellerlens_core::Error| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classify() {
        let cli = Cli::parse_from([
            "sellerlens",
            "classify",
            "--input",
            "reviews.jsonl",
            "--negatives",
            "negatives.jsonl",
            "--metrics",
            "-v",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Commands::Classify {
                input,
                output,
                negatives,
                metrics,
                ..
            } => {
                assert_eq!(input, "reviews.jsonl");
                assert!(output.is_none());
                assert_eq!(negatives, Some(PathBuf::from("negatives.jsonl")));
                assert!(metrics);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_check_rating() {
        let cli = Cli::parse_from([
            "sellerlens",
            "check",
            "--comment",
            "arrived late",
            "--rating",
            "Negative",
        ]);

        match cli.command {
            Commands::Check { rating, .. } => assert_eq!(rating, Rating::Negative),
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from([
            "sellerlens",
            "check",
            "--comment",
            "x",
            "--rating",
            "stars",
        ])
        .is_err());
    }
}
