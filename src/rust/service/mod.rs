//! HTTP surface: a single `POST /sentiment` route.

mod error;
mod handler;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::classifier::LabelClassifier;
use crate::pipeline::SentimentAnalyzer;

pub use error::{ApiError, ErrorBody, INTERNAL_ERROR_MESSAGE};
pub use handler::SentimentRequest;

#[derive(Clone, Debug)]
pub struct AppState {
    pub analyzer: SentimentAnalyzer,
}

/// Builds the router around an already loaded classifier.
pub fn router(classifier: Arc<dyn LabelClassifier>) -> Router {
    let state = AppState {
        analyzer: SentimentAnalyzer::new(classifier),
    };
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/sentiment", post(handler::sentiment))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .with_state(state)
}

/// Serves the router until the process is stopped.
pub async fn serve(addr: SocketAddr, classifier: Arc<dyn LabelClassifier>) -> anyhow::Result<()> {
    let app = router(classifier);
    let server = axum::Server::try_bind(&addr)?;
    log::info!("Listening on http://{}", addr);
    server.serve(app.into_make_service()).await?;
    Ok(())
}
