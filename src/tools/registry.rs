use super::traits::{Tool, ToolDefinition};
use std::sync::Arc;
use tracing::debug;

/// Registered tools in registration order. Names are unique; registering a
/// name again replaces the earlier tool in place.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(slot) => {
                debug!("Replacing tool registration: {}", tool.name());
                *slot = tool;
            }
            None => {
                debug!("Registered tool: {}", tool.name());
                self.tools.push(tool);
            }
        }
    }

    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn Tool>> {
        let idx = self.tools.iter().position(|t| t.name() == name)?;
        Some(self.tools.remove(idx))
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn clear(&mut self) {
        self.tools.clear();
    }

    /// Tools whose predicate holds right now. Predicates are re-run on every
    /// call since they read mutable host state.
    pub fn eligible_tools(&self) -> Vec<Arc<dyn Tool>> {
        self.tools
            .iter()
            .filter(|t| t.should_register())
            .cloned()
            .collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    pub fn eligible_definitions(&self) -> Vec<ToolDefinition> {
        self.eligible_tools().iter().map(|t| t.definition()).collect()
    }
}
