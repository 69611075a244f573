//! Application state wiring the engine to its infra implementations.
//!
//! The engine is generic over its store/generator/FAQ ports; AppState pins
//! them to the concrete infra types and owns the startup sequence: load
//! credentials (fatal when missing), tunables, and data documents (fatal for
//! corpus and menu), then assemble the dialogue engine.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parley_core::chat::FallbackChatStore;
use parley_core::engine::DialogueEngine;
use parley_core::menu::MenuTree;
use parley_infra::catalog::FsCatalog;
use parley_infra::config::{load_engine_config, Settings};
use parley_infra::llm::GeminiClient;
use parley_infra::store::RestChatStore;

/// The engine with its port generics pinned to the infra implementations.
pub type ConcreteEngine =
    DialogueEngine<FallbackChatStore<RestChatStore>, GeminiClient, FsCatalog>;

/// Shared application state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ConcreteEngine>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application: credentials, tunables, data, engine.
    pub async fn init(data_dir: PathBuf) -> anyhow::Result<Self> {
        let settings = Settings::from_env()?;
        let config = load_engine_config(&data_dir).await;
        let timeout = Duration::from_secs(config.request_timeout_secs);

        let catalog = FsCatalog::new(&data_dir);
        let corpus = catalog
            .load_corpus()
            .await
            .map_err(|e| anyhow::anyhow!("failed to load knowledge corpus: {e}"))?;
        let menu = catalog
            .load_menu()
            .await
            .map_err(|e| anyhow::anyhow!("failed to load menu catalog: {e}"))?;

        tracing::info!(data_dir = %data_dir.display(), "Data documents loaded");

        let store = FallbackChatStore::new(RestChatStore::new(
            settings.store_url,
            settings.store_api_key,
            timeout,
        ));
        let generator = GeminiClient::new(settings.gemini_api_key, timeout);

        let engine = DialogueEngine::new(
            MenuTree::new(menu),
            corpus,
            store,
            generator,
            catalog,
            config,
        );

        Ok(Self {
            engine: Arc::new(engine),
            data_dir,
        })
    }
}
