use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use commentsense::config::{DEFAULT_MODEL_PATH, DEFAULT_PORT};
use commentsense::{init_logger, service, Classifier, ServerConfig};
use log::info;

#[derive(Parser)]
#[command(author, version, about = "Serve POST /sentiment from a trained model", long_about = None)]
struct Args {
    /// Interface to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Model artifact produced by sentiment_train
    #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            model_path: args.model,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();
    let config = ServerConfig::from(Args::parse());

    info!("=== Starting sentiment service ===");
    let classifier = Classifier::load(&config.model_path)
        .with_context(|| format!("Failed to load model from {:?}", config.model_path))?;
    let model_info = classifier.info();
    info!(
        "Model ready: labels {:?}, {} words, dim {}, {}-grams",
        model_info.labels, model_info.vocabulary_size, model_info.dim, model_info.word_ngrams
    );

    service::serve(config.socket_addr(), Arc::new(classifier)).await
}
