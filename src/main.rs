use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use imgcls::http::{router, state::HttpState};
use imgcls::{Args, Device, ImgClassifier, ModelLoader, ModelRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    info!(device = %args.device, preferred = %Device::detect(), "selected compute device");

    let loader = ModelLoader::new(args.device).with_intra_threads(args.intra_threads);
    let registry = ModelRegistry::load(&args.models_dir, &loader)
        .with_context(|| format!("loading models from {}", args.models_dir.display()))?;

    let state = HttpState {
        classifier: Arc::new(ImgClassifier::new(registry)),
        static_dir: args.static_dir.clone(),
    };
    let app = router(state, args.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("binding {}", args.addr))?;
    info!("serving on http://{}", args.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
