use std::path::PathBuf;

use clap::Parser;
use commentsense::config::DEFAULT_MODEL_PATH;
use commentsense::init_logger;
use commentsense::trainer::dataset::{read_json_lines, DEFAULT_DATASET};
use commentsense::trainer::{train_to_file, DatasetManager, DatasetSpec, TrainingParams, DEFAULT_CORPUS_PATH};
use log::info;

#[derive(Parser)]
#[command(author, version, about = "Train the sentiment model from a labeled dataset", long_about = None)]
struct Args {
    /// Dataset name on the Hugging Face hub
    #[arg(long, default_value = DEFAULT_DATASET)]
    dataset: String,

    /// Dataset split to train on
    #[arg(long, default_value = "train")]
    split: String,

    /// Read examples from a local JSON-lines file instead of the hub
    #[arg(long)]
    dataset_file: Option<PathBuf>,

    /// Intermediate training file
    #[arg(long, default_value = DEFAULT_CORPUS_PATH)]
    corpus: PathBuf,

    /// Where to write the model artifact
    #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
    output: PathBuf,

    /// Force a fresh download of the dataset
    #[arg(short, long)]
    fresh: bool,

    /// Seed for weight initialization
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Args::parse();
    let spec = DatasetSpec::new(args.dataset, args.split);

    info!("=== Step 1: loading dataset ===");
    let examples = match &args.dataset_file {
        Some(path) => {
            info!("Reading examples from {:?}", path);
            read_json_lines(path, &spec)?
        }
        None => {
            let manager = DatasetManager::new_default()?;
            if args.fresh {
                info!("Fresh download requested - removing any cached copy...");
                manager.remove_cache(&spec)?;
            }
            manager.load(&spec).await?
        }
    };
    info!("Loaded {} examples", examples.len());

    info!("=== Step 2: training ===");
    let params = TrainingParams {
        seed: args.seed,
        ..TrainingParams::default()
    };
    let model = train_to_file(&examples, &args.corpus, &args.output, &params)?;
    info!(
        "=== Done: {} labels, {} words, saved to {:?} ===",
        model.dictionary().nlabels(),
        model.dictionary().nwords(),
        args.output
    );
    Ok(())
}
