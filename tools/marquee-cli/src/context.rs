//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use marquee_cache::Cache;
use marquee_commerce::cart::{CacheCartRepository, CartStore};
use marquee_commerce::checkout::{HttpCommerceApi, ReturnUrls};
use marquee_data::{FetchClient, ReqwestTransport};

use crate::config::StorefrontConfig;
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Storefront configuration.
    pub config: StorefrontConfig,
    /// Where the configuration came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(PathBuf::from(path)),
            None => StorefrontConfig::find(&cwd),
        };
        let config = match &config_path {
            Some(path) => StorefrontConfig::load(path)?,
            None => StorefrontConfig::default(),
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Directory holding the persisted cart.
    pub fn storage_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.storage.directory)
    }

    /// Open the single cart store for this invocation.
    pub fn open_cart(&self) -> Result<CartStore<CacheCartRepository>> {
        let dir = self.storage_dir();
        let cache = Cache::open_dir(&dir)
            .with_context(|| format!("Failed to open cart storage: {}", dir.display()))?;
        tracing::debug!(dir = %dir.display(), "cart storage opened");
        Ok(CartStore::open(CacheCartRepository::with_namespace(
            cache,
            &self.config.storage.namespace,
        )))
    }

    /// The commerce backend client.
    pub fn commerce_api(&self) -> Result<HttpCommerceApi<ReqwestTransport>> {
        let Some(base_url) = self.config.api.base_url.as_deref() else {
            bail!("api.base_url is not set. Run `marquee config init` and edit the [api] section.");
        };

        let client = FetchClient::new(ReqwestTransport::new()).with_base_url(base_url);
        let mut api =
            HttpCommerceApi::new(client).with_endpoints(self.config.api.endpoints.clone());
        if let Some(token) = self.config.api_token() {
            api = api.with_token(token);
        }
        Ok(api)
    }

    /// Success and failure return URLs for the configured origin.
    pub fn return_urls(&self) -> ReturnUrls {
        self.config.checkout.return_urls()
    }
}
