use std::sync::Arc;

use crate::config::Config;
use crate::pipeline_client::PipelineApi;
use crate::session::Session;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable upstream. Default: `HttpPipelineClient`.
    pub pipeline: Arc<dyn PipelineApi>,
    pub config: Config,
    /// The one session this process serves. Ephemeral; reset tears it down.
    pub session: Arc<Session>,
}
