use std::sync::Arc;

use anyhow::Context;
use chartfeed_core::live::TokioPacer;
use chartfeed_core::storage::ObjectStore;
use chartfeed_core::utils::SystemClock;
use chartfeed_core::{ChartDataService, CoreConfig};
use chartfeed_market_data::{DhanProvider, QuoteProvider};
use chartfeed_storage_s3::{FsObjectStore, S3ObjectStore, S3Settings};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Cli, StoreKind};

pub fn init_tracing() {
    let log_format =
        std::env::var("CHARTFEED_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub async fn build_store(cli: &Cli) -> Arc<dyn ObjectStore> {
    match cli.store {
        StoreKind::S3 => {
            let settings = S3Settings {
                region: Some(cli.region.clone()),
                endpoint: cli.s3_endpoint.clone(),
            };
            Arc::new(S3ObjectStore::connect(&settings).await) as Arc<dyn ObjectStore>
        }
        StoreKind::Fs => {
            tracing::info!("Using local object store at {}", cli.fs_root.display());
            Arc::new(FsObjectStore::new(cli.fs_root.clone())) as Arc<dyn ObjectStore>
        }
    }
}

pub fn build_provider(cli: &Cli) -> Option<Arc<dyn QuoteProvider>> {
    let provider =
        DhanProvider::from_credentials(cli.dhan_client_id.clone(), cli.dhan_access_token.clone());
    match provider {
        Some(provider) => {
            let provider = match &cli.dhan_base_url {
                Some(url) => provider.with_base_url(url.clone()),
                None => provider,
            };
            Some(Arc::new(provider) as Arc<dyn QuoteProvider>)
        }
        None => {
            tracing::warn!("Dhan credentials not configured; live quotes disabled");
            None
        }
    }
}

pub async fn build_service(
    cli: &Cli,
) -> anyhow::Result<(Arc<ChartDataService>, Arc<dyn ObjectStore>)> {
    let config = CoreConfig::from_env().context("invalid CHARTFEED_* configuration")?;
    let store = build_store(cli).await;
    let service = ChartDataService::new(
        config,
        store.clone(),
        build_provider(cli),
        Arc::new(TokioPacer),
        Arc::new(SystemClock),
    );
    Ok((Arc::new(service), store))
}
