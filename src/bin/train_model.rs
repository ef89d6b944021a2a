use std::{fs, path::PathBuf, process::ExitCode};

use clap::Parser;

use expenseur_rs::{TrainingConfig, fit_model, read_dataset};

/// Fits the expense category classifier and writes the artifact consumed by
/// the server at startup.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to a CSV file with `description` and `category` columns.
    #[arg(long, default_value = "dataset.csv")]
    dataset: PathBuf,

    /// File path to write the fitted model artifact to.
    #[arg(long, default_value = "model.json")]
    model_path: PathBuf,

    /// The gradient descent step size.
    #[arg(long, default_value_t = TrainingConfig::default().learning_rate)]
    learning_rate: f64,

    /// The number of full passes over the dataset.
    #[arg(long, default_value_t = TrainingConfig::default().epochs)]
    epochs: usize,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let examples = match read_dataset(&args.dataset) {
        Ok(examples) => examples,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };

    let config = TrainingConfig {
        learning_rate: args.learning_rate,
        epochs: args.epochs,
    };

    let artifact = match fit_model(&examples, &config) {
        Ok(artifact) => artifact,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };

    let json = serde_json::to_string_pretty(&artifact)
        .expect("a fitted artifact always serializes to JSON");

    if let Err(error) = fs::write(&args.model_path, json) {
        eprintln!("could not write {}: {error}", args.model_path.display());
        return ExitCode::FAILURE;
    }

    println!(
        "Fitted {} categories over {} examples and wrote {}.",
        artifact.classes.len(),
        examples.len(),
        args.model_path.display()
    );

    ExitCode::SUCCESS
}
