//! testu CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "testu", version, about = "AI quiz generator and answer grader")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a quiz and take it interactively
    Run {
        /// Quiz topic (e.g. "Lietuvos istorija")
        #[arg(long)]
        topic: String,

        /// Difficulty: easy, medium, hard
        #[arg(long, default_value = "medium")]
        difficulty: String,

        /// Number of questions (default from config)
        #[arg(long)]
        num_questions: Option<u32>,

        /// Model to use (default from config)
        #[arg(long)]
        model: Option<String>,

        /// Provider to use (default from config)
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Grade a single answer against a correct one
    Check {
        /// Question kind: multiple_choice or short
        #[arg(long, default_value = "short")]
        kind: String,

        /// The canonical correct answer
        #[arg(long)]
        correct: String,

        /// The submitted answer
        #[arg(long)]
        answer: String,

        /// Question text (shown in feedback only)
        #[arg(long, default_value = "")]
        question: String,

        /// Optional explanation carried into the feedback
        #[arg(long)]
        explanation: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Exit code 1 if the answer is incorrect
        #[arg(long)]
        fail_on_incorrect: bool,
    },

    /// Show recent quiz results
    History {
        /// Number of entries to show
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show aggregate statistics over the quiz history
    Stats {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List available models
    Models {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("testu=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            topic,
            difficulty,
            num_questions,
            model,
            provider,
            config,
        } => commands::run::execute(topic, difficulty, num_questions, model, provider, config).await,
        Commands::Check {
            kind,
            correct,
            answer,
            question,
            explanation,
            format,
            fail_on_incorrect,
        } => commands::check::execute(
            kind,
            correct,
            answer,
            question,
            explanation,
            format,
            fail_on_incorrect,
        ),
        Commands::History { limit, config } => commands::history::execute(limit, config),
        Commands::Stats { config } => commands::stats::execute(config),
        Commands::Models { provider, config } => commands::models::execute(provider, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
