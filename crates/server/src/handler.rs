//! Server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::analyze::{AnalyzeParams, analyze_impl};
use crate::tools::product_reviews::{ProductReviewsParams, product_reviews_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

use sentio_core::{AppConfig, ReviewStore};

/// The main server handler for sentio.
#[derive(Clone)]
pub struct SentioServer {
    config: AppConfig,
    store: ReviewStore,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl SentioServer {
    /// Create a new server handler.
    pub fn new(config: AppConfig, store: ReviewStore) -> Self {
        Self { config, store, tool_router: Self::tool_router() }
    }

    /// Scrape a product page's reviews and analyze them.
    ///
    /// Runs the full pipeline: scrape (rendered then static tier), filter,
    /// sentiment, aspects, aggregation, recommendation.
    #[tool(
        description = "Analyze the reviews on a product page URL. Returns per-review sentiment and aspects, aggregate statistics, and a buy/avoid/consider recommendation."
    )]
    async fn analyze_reviews(&self, params: Parameters<AnalyzeParams>) -> Result<CallToolResult, McpError> {
        analyze_impl(&self.config, &self.store, params.0).await
    }

    /// Read back previously archived reviews for a product.
    #[tool(description = "List archived reviews for a product id, oldest first.")]
    async fn product_reviews(&self, params: Parameters<ProductReviewsParams>) -> Result<CallToolResult, McpError> {
        product_reviews_impl(&self.store, params.0).await
    }
}

impl ServerHandler for SentioServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "sentio".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
