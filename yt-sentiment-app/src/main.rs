mod form;
mod utils;

use {
    std::sync::Arc,
    tracing::{info, warn},
    yt_sentiment_core::{
        analysis::Analyzer,
        config::Config,
        sentiment::RustBertClassifier,
        youtube::YoutubeClient,
    },
    crate::{
        form::{router, AppState},
        utils::init_logging,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("youtube comment sentiment analyzer");

    let config = Config::load();
    let youtube_config = config.youtube();
    if youtube_config.api_key().is_empty() {
        warn!("youtube api key is not configured, comment requests will be rejected");
    }

    let classifier = tokio::task::spawn_blocking(RustBertClassifier::load).await??;
    let analyzer = Analyzer::new(YoutubeClient::new(&youtube_config), Arc::new(classifier));
    let state = AppState::new(analyzer, config.form().default_limit())?;

    let bind = config.server().bind();
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("listening on http://{}", bind);

    axum::serve(listener, router(state)).await?;

    Ok(())
}
