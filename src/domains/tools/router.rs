//! Tool Router - builds the rmcp ToolRouter from the catalog.
//!
//! Every catalog entry becomes one route on the channel transport. Routes do
//! no work of their own: they hand the raw arguments to the shared
//! [`Dispatcher`] and wrap its text in a successful `CallToolResult`, so the
//! channel sees exactly what the HTTP execute endpoint returns.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::{CallToolResult, Content, JsonObject, Tool},
};

use super::catalog::ToolDescriptor;
use super::dispatcher::Dispatcher;
use crate::domains::schema::input_schema;

/// Describe a catalog entry as an MCP tool.
pub fn to_tool(descriptor: &ToolDescriptor) -> Tool {
    Tool {
        name: descriptor.name().into(),
        description: Some(descriptor.description().into()),
        input_schema: Arc::new(input_schema(descriptor)),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Run one tool call through the dispatcher. Failures are already text, so
/// the result is always a success.
async fn call_tool(
    dispatcher: Arc<Dispatcher>,
    name: &'static str,
    args: JsonObject,
) -> Result<CallToolResult, McpError> {
    let text = dispatcher.execute(name, &args).await;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn create_route<S>(descriptor: &ToolDescriptor, dispatcher: Arc<Dispatcher>) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    let name = descriptor.name();
    ToolRoute::new_dyn(to_tool(descriptor), move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        call_tool(dispatcher.clone(), name, args).boxed()
    })
}

/// Build the tool router with every tool in the dispatcher's catalog.
pub fn build_tool_router<S>(dispatcher: Arc<Dispatcher>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    dispatcher
        .catalog()
        .iter()
        .fold(ToolRouter::new(), |router, descriptor| {
            router.with_route(create_route(descriptor, dispatcher.clone()))
        })
}
