// Application state module
// Everything a request handler needs, built once before serving begins

use std::sync::Arc;

use super::types::Config;
use crate::logger::AccessLogFormat;
use crate::routing::Router;
use crate::snippet::IdGenerator;
use crate::store::SnippetStore;

/// Application state, shared read-only across connections
pub struct AppState {
    pub config: Config,
    pub router: Router,
    pub store: Arc<dyn SnippetStore>,
    pub generator: IdGenerator,
    /// Base address for snippet links, precomputed from config
    pub public_url: String,

    pub access_log: bool,
    /// Parsed once from `logging.access_log_format`
    pub access_log_format: AccessLogFormat,
}

impl AppState {
    pub fn new(config: &Config, router: Router, store: Arc<dyn SnippetStore>) -> Self {
        let generator = IdGenerator::new(config.storage.id_length, config.storage.alphabet);

        Self {
            config: config.clone(),
            router,
            store,
            generator,
            public_url: config.public_url(),
            access_log: config.logging.access_log,
            access_log_format: AccessLogFormat::parse(&config.logging.access_log_format),
        }
    }
}
