//! CLI command definitions and handlers

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::core::client::HttpEngine;
use crate::core::config::{CatalogConfig, ServerSettings};
use crate::core::engine::TranslationEngine;
use crate::core::models::CharLimit;
use crate::core::validator::RawTranslateInput;
use crate::server::api::ErrorResponse;
use crate::service::dispatch::Dispatcher;
use crate::testing::EchoEngine;

/// Which engine runs the models
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineKind {
    /// Remote model endpoint (TRANSLATE_API_* env vars)
    Http,
    /// Echo the input tagged with the model id, for local testing
    Echo,
}

/// Catalog and engine selection shared by several commands
#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    /// Catalog file with languages and models (YAML, JSON or TOML)
    #[arg(long, env = "CATALOG_PATH")]
    pub catalog: Option<PathBuf>,

    /// Translation engine
    #[arg(long, value_enum, default_value_t = EngineKind::Http, env = "TRANSLATE_ENGINE")]
    pub engine: EngineKind,

    /// Set character limit (-1 for no limit)
    #[arg(long, default_value_t = -1, allow_negative_numbers = true, env = "CHAR_LIMIT")]
    pub char_limit: i64,
}

impl CatalogArgs {
    fn engine(&self) -> anyhow::Result<Arc<dyn TranslationEngine>> {
        let engine: Arc<dyn TranslationEngine> = match self.engine {
            EngineKind::Http => Arc::new(HttpEngine::from_env()?),
            EngineKind::Echo => Arc::new(EchoEngine::default()),
        };
        Ok(engine)
    }

    /// Load the catalog and wire the dispatcher
    pub fn dispatcher(&self) -> anyhow::Result<Dispatcher> {
        let catalog = CatalogConfig::load(self.catalog.as_deref())?;
        let char_limit = CharLimit::from_raw(self.char_limit)?;
        let engine = self.engine()?;
        info!("Using {} engine", engine.name());
        Ok(Dispatcher::from_catalog(&catalog, engine, char_limit)?)
    }
}

/// Commands for Translate Gateway
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP API server
    Serve {
        /// Hostname
        #[arg(long, default_value = "127.0.0.1", env = "HOST")]
        host: String,

        /// Port
        #[arg(short, long, default_value_t = 5000, env = "PORT")]
        port: u16,

        /// Set maximum number of requests per hour per client (-1 for no limit)
        #[arg(long, default_value_t = -1, allow_negative_numbers = true, env = "REQ_LIMIT")]
        req_limit: i64,

        /// Rate-limit by the first X-Forwarded-For hop (only behind a trusted reverse proxy)
        #[arg(long, env = "TRUST_PROXY")]
        trust_proxy: bool,

        /// Enable Google Analytics on the landing page by providing an ID
        #[arg(long, env = "GOOGLE_ANALYTICS")]
        google_analytics: Option<String>,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Print the supported languages as JSON
    Languages {
        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Translate a single text and print the result
    Translate {
        /// Text to translate
        #[arg(short, long)]
        q: String,

        /// Source language code
        #[arg(short, long)]
        source: String,

        /// Target language code
        #[arg(short, long)]
        target: String,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Print the OpenAPI document
    Spec {
        /// Emit YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },
}

/// Handle server command
pub async fn handle_serve(
    host: String,
    port: u16,
    req_limit: i64,
    trust_proxy: bool,
    google_analytics: Option<String>,
    catalog: CatalogArgs,
) -> anyhow::Result<()> {
    use crate::server::api::run_server;

    let settings = ServerSettings::from_raw(host, port, req_limit, trust_proxy, google_analytics)?;
    let dispatcher = catalog.dispatcher()?;

    let address = settings.display_address();
    info!("Starting HTTP server on {}", address);
    println!("🚀 Server starting on http://{}", address);
    println!("📊 API Documentation: http://{}/docs", address);
    println!("📄 OpenAPI spec: http://{}/spec", address);

    run_server(dispatcher, settings).await?;

    Ok(())
}

/// Handle languages command
pub async fn handle_languages(catalog: CatalogArgs) -> anyhow::Result<()> {
    let dispatcher = catalog.dispatcher()?;
    println!("{}", serde_json::to_string_pretty(&dispatcher.languages())?);
    Ok(())
}

/// Handle translate command
pub async fn handle_translate(
    q: String,
    source: String,
    target: String,
    catalog: CatalogArgs,
) -> anyhow::Result<()> {
    let dispatcher = catalog.dispatcher()?;

    match dispatcher.dispatch(RawTranslateInput::new(&q, &source, &target)).await {
        Ok(translated) => {
            println!("{}", translated);
            Ok(())
        }
        Err(e) => {
            let envelope = ErrorResponse { error: e.to_string() };
            eprintln!("{}", serde_json::to_string(&envelope)?);
            anyhow::bail!("translation failed with status {}", e.status_code())
        }
    }
}

/// Handle spec command
pub async fn handle_spec(yaml: bool) -> anyhow::Result<()> {
    use crate::server::docs::ApiDoc;
    use utoipa::OpenApi;

    let doc = ApiDoc::openapi();
    let rendered = if yaml {
        serde_yaml::to_string(&doc)?
    } else {
        serde_json::to_string_pretty(&doc)?
    };
    println!("{}", rendered);

    Ok(())
}
