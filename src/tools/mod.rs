//! Tool registration and invocation.

pub mod builtin;
pub mod context;
pub mod error;
pub mod invoker;
pub mod registry;
pub mod schema;
pub mod traits;

pub use context::{ToolContext, ToolSettings};
pub use error::{SchemaViolation, ToolError};
pub use invoker::ToolInvoker;
pub use registry::ToolRegistry;
pub use traits::{Tool, ToolDefinition, ToolOutput};
