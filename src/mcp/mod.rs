//! MCP server exposing stakeholder records to chat agents.

mod types;

pub use types::*;

use chrono::NaiveDate;
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::Serialize;

use crate::error::StoreError;
use crate::models::*;
use crate::registry::StakeholderRegistry;
use crate::store::StakeholderStore;

#[derive(Clone)]
pub struct McpServer {
    registry: StakeholderRegistry,
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    pub fn new(registry: StakeholderRegistry) -> Self {
        Self {
            registry,
            tool_router: Self::tool_router(),
        }
    }

    /// Invariant violations are the caller's to fix; I/O failures are ours.
    fn store_err(e: StoreError) -> McpError {
        match e {
            StoreError::Io(_) => {
                tracing::error!("Stakeholder store I/O error: {}", e);
                McpError::internal_error(e.to_string(), None)
            }
            _ => McpError::invalid_params(e.to_string(), None),
        }
    }

    fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    async fn store(&self, project: &str) -> Result<StakeholderStore, McpError> {
        self.registry.store(project).await.map_err(Self::store_err)
    }

    fn parse_date(date: Option<&str>) -> Result<NaiveDate, McpError> {
        match date {
            Some(d) => NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").map_err(|e| {
                McpError::invalid_params(format!("Invalid date '{}': {}", d, e), None)
            }),
            None => Ok(chrono::Local::now().date_naive()),
        }
    }

    // ============================================================
    // Tool logic, callable directly for testing
    // ============================================================

    pub async fn call_list_stakeholders(
        &self,
        req: ProjectRequest,
    ) -> Result<Vec<StakeholderSummary>, McpError> {
        self.store(&req.project)
            .await?
            .list()
            .await
            .map_err(Self::store_err)
    }

    pub async fn call_get_stakeholder(
        &self,
        req: StakeholderNameRequest,
    ) -> Result<Stakeholder, McpError> {
        self.store(&req.project)
            .await?
            .get(&req.name)
            .await
            .map_err(Self::store_err)?
            .ok_or_else(|| {
                McpError::invalid_params(format!("Stakeholder not found: {}", req.name), None)
            })
    }

    pub async fn call_find_stakeholder(
        &self,
        req: FindStakeholderRequest,
    ) -> Result<Stakeholder, McpError> {
        self.store(&req.project)
            .await?
            .find(&req.query)
            .await
            .map_err(Self::store_err)?
            .ok_or_else(|| {
                McpError::invalid_params(
                    format!("No stakeholder matches '{}'", req.query),
                    None,
                )
            })
    }

    pub async fn call_find_stakeholders(
        &self,
        req: FindStakeholderRequest,
    ) -> Result<Vec<StakeholderMatchInfo>, McpError> {
        let matches = self
            .store(&req.project)
            .await?
            .find_all(&req.query)
            .await
            .map_err(Self::store_err)?;

        Ok(matches
            .into_iter()
            .map(|m| StakeholderMatchInfo {
                name: m.stakeholder.name,
                role: m.stakeholder.role,
                score: m.tier.score(),
                match_type: m.tier.as_str().to_string(),
            })
            .collect())
    }

    pub async fn call_add_stakeholder(
        &self,
        req: AddStakeholderRequest,
    ) -> Result<Stakeholder, McpError> {
        let stakeholder = Stakeholder {
            name: req.name,
            role: req.role,
            description: req.description,
            goals: req.goals.into_iter().map(StakeholderGoal::new).collect(),
            pain_points: req.pain_points,
            priorities: req.priorities,
        };

        self.store(&req.project)
            .await?
            .add(stakeholder)
            .await
            .map_err(Self::store_err)
    }

    pub async fn call_update_stakeholder(
        &self,
        req: UpdateStakeholderRequest,
    ) -> Result<Stakeholder, McpError> {
        let input = UpdateStakeholderInput {
            name: req.new_name,
            role: req.role,
            description: req.description,
            goals: req
                .goals
                .map(|goals| goals.into_iter().map(StakeholderGoal::new).collect()),
            pain_points: req.pain_points,
            priorities: req.priorities,
        };

        self.store(&req.project)
            .await?
            .update(&req.name, input)
            .await
            .map_err(Self::store_err)
    }

    pub async fn call_remove_stakeholder(
        &self,
        req: StakeholderNameRequest,
    ) -> Result<Stakeholder, McpError> {
        self.store(&req.project)
            .await?
            .remove(&req.name)
            .await
            .map_err(Self::store_err)
    }

    pub async fn call_link_issue_to_goal(
        &self,
        req: GoalIssueRequest,
    ) -> Result<GoalLinkInfo, McpError> {
        let goal = self
            .store(&req.project)
            .await?
            .link_issue_to_goal(&req.name, &req.goal, req.issue_number)
            .await
            .map_err(Self::store_err)?;

        Ok(GoalLinkInfo {
            stakeholder: req.name,
            goal: goal.text,
            linked_issues: goal.linked_issues,
        })
    }

    pub async fn call_unlink_issue_from_goal(
        &self,
        req: GoalIssueRequest,
    ) -> Result<GoalLinkInfo, McpError> {
        let goal = self
            .store(&req.project)
            .await?
            .unlink_issue_from_goal(&req.name, &req.goal, req.issue_number)
            .await
            .map_err(Self::store_err)?;

        Ok(GoalLinkInfo {
            stakeholder: req.name,
            goal: goal.text,
            linked_issues: goal.linked_issues,
        })
    }

    pub async fn call_goals_for_issue(
        &self,
        req: IssueRequest,
    ) -> Result<Vec<IssueGoalRef>, McpError> {
        self.store(&req.project)
            .await?
            .goals_for_issue(req.issue_number)
            .await
            .map_err(Self::store_err)
    }

    pub async fn call_add_conflict_resolution(
        &self,
        req: AddConflictResolutionRequest,
    ) -> Result<ConflictResolution, McpError> {
        let resolution = ConflictResolution {
            date: Self::parse_date(req.date.as_deref())?,
            stakeholder1: req.stakeholder1,
            stakeholder2: req.stakeholder2,
            conflict: req.conflict,
            decision: req.decision,
            rationale: req.rationale,
        };

        self.store(&req.project)
            .await?
            .add_conflict_resolution(resolution)
            .await
            .map_err(Self::store_err)
    }

    pub async fn call_list_conflict_resolutions(
        &self,
        req: ListConflictResolutionsRequest,
    ) -> Result<Vec<ConflictResolution>, McpError> {
        let store = self.store(&req.project).await?;
        let conflicts = match req.stakeholder {
            Some(name) => store.conflicts_involving(&name).await,
            None => store.conflict_resolutions().await,
        };
        conflicts.map_err(Self::store_err)
    }
}

#[tool_router]
impl McpServer {
    // ============================================================
    // Lookup Tools
    // ============================================================

    #[tool(
        description = "List every stakeholder in a project with counts of goals, pain points and linked issues. Use find_stakeholder or get_stakeholder for full details."
    )]
    async fn list_stakeholders(
        &self,
        params: Parameters<ProjectRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.call_list_stakeholders(params.0).await?;
        Self::json_result(&result)
    }

    #[tool(
        description = "Get a stakeholder by exact, case-sensitive name. Returns role, description, goals with linked issues, pain points and ranked priorities."
    )]
    async fn get_stakeholder(
        &self,
        params: Parameters<StakeholderNameRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.call_get_stakeholder(params.0).await?;
        Self::json_result(&result)
    }

    #[tool(
        description = "Resolve a partial or differently-cased name to one stakeholder. Tries exact, then case-insensitive, then prefix, then substring matching and returns the first hit. Use this when the user refers to a stakeholder loosely (e.g. 'end' for 'End User')."
    )]
    async fn find_stakeholder(
        &self,
        params: Parameters<FindStakeholderRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.call_find_stakeholder(params.0).await?;
        Self::json_result(&result)
    }

    #[tool(
        description = "List every stakeholder matching a partial name, best match first. Use this to disambiguate when find_stakeholder might pick the wrong one."
    )]
    async fn find_stakeholders(
        &self,
        params: Parameters<FindStakeholderRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.call_find_stakeholders(params.0).await?;
        Self::json_result(&result)
    }

    #[tool(
        description = "Goals across all stakeholders that an issue is linked to. Use this to explain who benefits from an issue."
    )]
    async fn goals_for_issue(
        &self,
        params: Parameters<IssueRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.call_goals_for_issue(params.0).await?;
        Self::json_result(&result)
    }

    #[tool(
        description = "List recorded conflict resolutions, optionally only those involving one stakeholder."
    )]
    async fn list_conflict_resolutions(
        &self,
        params: Parameters<ListConflictResolutionsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.call_list_conflict_resolutions(params.0).await?;
        Self::json_result(&result)
    }

    // ============================================================
    // Mutation Tools
    // ============================================================

    #[tool(
        description = "Add a stakeholder. Fails if the name is already taken. Side effect: rewrites the project's stakeholders.md."
    )]
    async fn add_stakeholder(
        &self,
        params: Parameters<AddStakeholderRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.call_add_stakeholder(params.0).await?;
        Self::json_result(&result)
    }

    #[tool(
        description = "Update fields of an existing stakeholder. Only supplied fields change; list fields are replaced wholesale."
    )]
    async fn update_stakeholder(
        &self,
        params: Parameters<UpdateStakeholderRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.call_update_stakeholder(params.0).await?;
        Self::json_result(&result)
    }

    #[tool(description = "Remove a stakeholder and its goal-issue links.")]
    async fn remove_stakeholder(
        &self,
        params: Parameters<StakeholderNameRequest>,
    ) -> Result<CallToolResult, McpError> {
        let removed = self.call_remove_stakeholder(params.0).await?;
        Ok(CallToolResult::success(vec![Content::text(format!(
            "Removed stakeholder '{}'",
            removed.name
        ))]))
    }

    #[tool(
        description = "Link an issue number to one of a stakeholder's goals. Linking twice is harmless."
    )]
    async fn link_issue_to_goal(
        &self,
        params: Parameters<GoalIssueRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.call_link_issue_to_goal(params.0).await?;
        Self::json_result(&result)
    }

    #[tool(
        description = "Remove an issue number from a stakeholder's goal. Removing an issue that is not linked is harmless."
    )]
    async fn unlink_issue_from_goal(
        &self,
        params: Parameters<GoalIssueRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.call_unlink_issue_from_goal(params.0).await?;
        Self::json_result(&result)
    }

    #[tool(
        description = "Record how a conflict between two stakeholders was resolved. Appends to the project's conflict log."
    )]
    async fn add_conflict_resolution(
        &self,
        params: Parameters<AddConflictResolutionRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.call_add_conflict_resolution(params.0).await?;
        Self::json_result(&result)
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: rmcp::model::Implementation {
                name: "stakeholder-store".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            instructions: Some(
                r#"Stakeholder records for a project: who cares about it, what they want, and which issues serve which goal.

Every tool takes a `project` identifier. Records live in a markdown file per project that people also edit by hand.

WORKFLOW:
1. Call list_stakeholders to see who exists
2. Resolve loose references with find_stakeholder (or find_stakeholders when ambiguous)
3. Use exact names and exact goal text with the mutation tools
4. Link issues to goals with link_issue_to_goal so planning can trace work back to people
5. Record trade-offs between stakeholders with add_conflict_resolution"#
                    .into(),
            ),
            ..Default::default()
        }
    }
}

pub async fn run_stdio_server(registry: StakeholderRegistry) -> anyhow::Result<()> {
    use tokio::io::{stdin, stdout};

    tracing::info!("Starting MCP server via stdio");

    let service = McpServer::new(registry);
    let server = service.serve((stdin(), stdout())).await?;

    let quit_reason = server.waiting().await?;
    tracing::info!("MCP server stopped: {:?}", quit_reason);

    Ok(())
}
