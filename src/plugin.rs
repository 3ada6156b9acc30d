//! Plugin lifecycle: activation registers the built-in tools, deactivation
//! tears them down.

use crate::tools::builtin::{builtin_tools, BackgroundImageTool};
use crate::tools::{ToolContext, ToolInvoker, ToolRegistry};
use std::sync::Arc;
use tracing::{debug, info};

pub struct Plugin {
    ctx: Arc<ToolContext>,
    registry: ToolRegistry,
    background: Arc<BackgroundImageTool>,
}

impl Plugin {
    /// Build the registry and register every built-in tool.
    pub fn activate(ctx: Arc<ToolContext>) -> Self {
        let (tools, background) = builtin_tools(&ctx);
        let mut registry = ToolRegistry::new();
        for tool in tools {
            registry.register(tool);
        }
        info!("Plugin activated with {} tools", registry.len());

        Self {
            ctx,
            registry,
            background,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn invoker(&self) -> ToolInvoker<'_> {
        ToolInvoker::new(&self.registry, self.ctx.notifier.as_ref())
    }

    /// Cancel the latest background generation and drop every tool.
    pub fn deactivate(mut self) {
        if self.background.cancel_latest() {
            debug!("Cancelled in-flight background generation");
        }
        self.registry.clear();
        info!("Plugin deactivated");
    }
}
