//! The blockio-nri plugin adapter.
//!
//! Despite the name this plugin performs no block-I/O configuration yet: it
//! records every invocation in the plugin log and answers with an empty
//! result tagged with its own name.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::logging::PluginLog;
use crate::nri::{Context, Plugin, PluginResult, Request};

/// Identifier the runtime uses to address this plugin.
pub const PLUGIN_TYPE: &str = "blockio-nri";

/// Stateless NRI plugin; every invocation is independent.
#[derive(Debug, Clone)]
pub struct BlockioNri {
    log: PluginLog,
}

impl BlockioNri {
    pub fn new(log: PluginLog) -> Self {
        Self { log }
    }
}

#[async_trait]
impl Plugin for BlockioNri {
    fn plugin_type(&self) -> &str {
        PLUGIN_TYPE
    }

    async fn invoke(&self, ctx: &Context, request: &Request) -> Result<PluginResult> {
        let result = request.new_result(PLUGIN_TYPE);
        self.log.scoped(|| {
            debug!("context: {:?}", ctx);
            debug!("request: {:?}", request);
        });
        Ok(result)
    }
}
