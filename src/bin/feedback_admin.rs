//! Offline maintenance for the feedback store.
//!
//! ```bash
//! feedback-admin count
//! feedback-admin clear          # asks for a typed confirmation
//! feedback-admin seed --count 5
//! feedback-admin export --out feedback.csv
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use feedback_api::{
    app,
    config::AppConfig,
    feedback::{handlers::sample_answers, FeedbackSubmission, SubmissionSource},
    maintenance,
    reports::export,
    store::{self, SubmissionStore},
};

const CONFIRM_PHRASE: &str = "DELETE ALL FEEDBACK";

/// Feedback store maintenance
#[derive(Parser, Debug)]
#[command(name = "feedback-admin")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the number of stored submissions
    Count,

    /// Delete every submission after a typed confirmation
    Clear,

    /// Insert sample submissions tagged as test data
    Seed {
        #[arg(short, long, default_value_t = 1)]
        count: u32,
    },

    /// Write all submissions to a CSV file
    Export {
        #[arg(short, long)]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    app::init_tracing("feedback_api=warn,feedback_admin=info");
    let cli = Cli::parse();

    let config = AppConfig::from_env()?;
    let store = store::connect(&config.store)?;

    match cli.command {
        Command::Count => {
            println!("{} submissions in {} store", store.count().await?, store.backend());
        }
        Command::Clear => clear(store.as_ref()).await?,
        Command::Seed { count } => {
            for _ in 0..count {
                store
                    .insert(FeedbackSubmission::new(sample_answers(), SubmissionSource::Test))
                    .await?;
            }
            println!("inserted {count} test submissions");
        }
        Command::Export { out } => {
            let records = store.list_all().await?;
            let csv = export::to_csv(&records)?;
            tokio::fs::write(&out, csv)
                .await
                .with_context(|| format!("write {}", out.display()))?;
            println!("wrote {} rows to {}", records.len(), out.display());
        }
    }
    Ok(())
}

async fn clear(store: &dyn SubmissionStore) -> Result<()> {
    let total = store.count().await?;
    if total == 0 {
        println!("store is already empty");
        return Ok(());
    }

    println!("This permanently deletes {total} submissions from the {} store.", store.backend());
    print!("Type '{CONFIRM_PHRASE}' to continue: ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    if !confirmed(&answer) {
        println!("aborted; nothing deleted");
        return Ok(());
    }

    let outcome = maintenance::clear_all(store).await?;
    println!(
        "deleted {} submissions, {} remaining",
        outcome.records_deleted, outcome.remaining_records
    );
    Ok(())
}

fn confirmed(answer: &str) -> bool {
    answer.trim_end_matches(['\r', '\n']) == CONFIRM_PHRASE
}
