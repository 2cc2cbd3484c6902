//! MCP tool handlers for the fallback server.
//!
//! This module implements the MCP tools using the rmcp SDK's tool_router pattern.

use crate::classifier::{best_match, AreaScore, AsyncClassifier};
use crate::models::FallbackConfig;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;

/// The MCP server that routes unanswered questions to company contacts.
#[derive(Clone)]
pub struct FallbackMcpServer {
    classifier: Arc<dyn AsyncClassifier>,
    tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for FallbackMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "fallback-handler".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("Routes questions that could not be answered automatically to the right company area contact, or to the general contact when no area matches.".into()),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct QueryParams {
    /// The user's question, as free text
    query: String,
}

// Helper function to convert errors to MCP errors
fn to_mcp_error(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

/// Classification result for `query`: the winning area (if any) and every
/// non-zero score.
fn classification_payload(
    query: &str,
    config: &FallbackConfig,
    scores: &[AreaScore],
) -> serde_json::Value {
    let describe = |score: &AreaScore| {
        let area = &config.areas[score.index];
        serde_json::json!({
            "area_id": area.area_id,
            "area_name": area.area_name,
            "score": score.score,
            "matched_keywords": score.matched_keywords,
        })
    };

    let best = best_match(scores).map(|best| {
        let area = &config.areas[best.index];
        serde_json::json!({
            "area_id": area.area_id,
            "area_name": area.area_name,
            "description": area.description,
            "contact": area.contact,
            "score": best.score,
            "matched_keywords": best.matched_keywords,
        })
    });

    serde_json::json!({
        "query": query,
        "matched": best.is_some(),
        "area": best,
        "scores": scores.iter().map(describe).collect::<Vec<_>>(),
    })
}

/// Overview of the loaded configuration.
fn areas_payload(config: &FallbackConfig) -> serde_json::Value {
    serde_json::json!({
        "area_count": config.areas.len(),
        "areas": config.areas.iter().map(|area| {
            serde_json::json!({
                "area_id": area.area_id,
                "area_name": area.area_name,
                "description": area.description,
                "keywords": area.keywords,
                "contact": area.contact,
            })
        }).collect::<Vec<_>>(),
        "default_contact": config.default_contact,
        "last_updated": config.last_updated.to_rfc3339(),
    })
}

#[tool_router]
impl FallbackMcpServer {
    /// Create a new fallback MCP server.
    pub fn new(classifier: Arc<dyn AsyncClassifier>) -> Self {
        Self {
            classifier,
            tool_router: Self::tool_router(),
        }
    }

    /// Contact details for a question that could not be answered automatically.
    #[tool(
        description = "Get the contact to refer a user to when their question could not be answered. Picks the company area whose keywords best match the question, or the general contact when none match."
    )]
    async fn get_fallback_response(
        &self,
        params: Parameters<QueryParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        let response = self
            .classifier
            .get_fallback_response(&params.query)
            .await
            .map_err(|e| {
                tracing::error!("Failed to build fallback response: {}", e);
                to_mcp_error(e)
            })?;

        let json_response = serde_json::to_string_pretty(&response).map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }

    /// Show how a question scores against each company area.
    #[tool(
        description = "Classify a question into a company area by keyword matching. Returns the best area (ties go to the area listed first) and the score and matched keywords of every area that matched."
    )]
    async fn classify_query(
        &self,
        params: Parameters<QueryParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        let config = self.classifier.get_config().await.map_err(to_mcp_error)?;
        let scores = self
            .classifier
            .score_query(&params.query)
            .await
            .map_err(to_mcp_error)?;

        let json_response =
            serde_json::to_string_pretty(&classification_payload(&params.query, &config, &scores))
                .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }

    /// List the configured company areas.
    #[tool(description = "List the configured company areas with their keywords and contacts, plus the general contact")]
    async fn list_company_areas(&self) -> Result<CallToolResult, McpError> {
        let config = self.classifier.get_config().await.map_err(to_mcp_error)?;

        let json_response =
            serde_json::to_string_pretty(&areas_payload(&config)).map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }
}
