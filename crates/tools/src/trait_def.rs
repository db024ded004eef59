//! Tool Trait
//!
//! Every capability in the tool set implements `Tool`. Arguments arrive
//! already decoded into the tool's own `Args` type by `ToolInput`, so a
//! handler never inspects a loose JSON bag.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use docsmith_core::ToolContext;
use docsmith_llm::{ParameterSchema, ToolDefinition};

use crate::executor::ToolResult;

#[async_trait]
pub trait Tool: Send + Sync {
    /// Typed argument struct for this tool.
    type Args: DeserializeOwned + Send + 'static;

    /// Name the model uses to invoke the tool.
    fn name(&self) -> &'static str;

    /// One-paragraph description shown to the model.
    fn description(&self) -> &'static str;

    /// JSON schema of `Args`.
    fn parameters_schema(&self) -> ParameterSchema;

    /// Run the tool. Faults must be returned as `ToolResult::err`.
    async fn execute(&self, ctx: &mut ToolContext<'_>, args: Self::Args) -> ToolResult;

    /// Catalog entry sent to the LLM.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.parameters_schema(),
        }
    }
}
