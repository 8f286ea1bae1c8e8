use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::{JsonObject, Tool};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::buttondown::{self, ButtondownClient, EmailStatus};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Api(#[from] buttondown::Error),

    #[error("Failed to serialize tool output: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Serialize)]
pub struct Property {
    pub r#type: String,
    pub description: String,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
}

impl Property {
    fn new(r#type: &str, description: &str) -> Self {
        Self {
            r#type: r#type.to_string(),
            description: description.to_string(),
            allowed: None,
        }
    }
}

#[derive(Serialize)]
pub struct Parameters<Props: Serialize> {
    pub r#type: String,
    pub properties: Props,
    pub required: Vec<String>,
    #[serde(rename = "additionalProperties")]
    pub additional_properties: bool,
}

/// The shape MCP clients see in `tools/list`.
#[derive(Serialize)]
pub struct ToolDefinition<Props: Serialize> {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Parameters<Props>,
}

impl<Props: Serialize> ToolDefinition<Props> {
    fn new(name: &str, description: &str, properties: Props, required: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: Parameters {
                r#type: String::from("object"),
                properties,
                required: required.iter().map(|r| r.to_string()).collect(),
                additional_properties: false,
            },
        }
    }
}

// Tools are kept in one collection and listed by serializing it, so the
// trait has to be object safe and serializable. `serde::Serialize` isn't
// object safe; `erased_serde` is.
#[async_trait]
pub trait ToolCall: erased_serde::Serialize {
    /// Run the tool and return the text payload for the MCP response.
    async fn call(&self, args: Value) -> Result<String, ToolError>;
    fn function_name(&self) -> String;
}
erased_serde::serialize_trait_object!(ToolCall);

pub type BoxedToolCall = Box<dyn ToolCall + Send + Sync + 'static>;

#[derive(Deserialize)]
struct SerializedDefinition {
    name: String,
    description: String,
    #[serde(rename = "inputSchema")]
    input_schema: JsonObject,
}

/// Convert a tool's serialized definition into the SDK's `Tool`.
pub fn to_mcp_tool(tool: &BoxedToolCall) -> Result<Tool, serde_json::Error> {
    let definition: SerializedDefinition = serde_json::from_value(serde_json::to_value(tool)?)?;
    Ok(Tool::new(
        definition.name,
        definition.description,
        definition.input_schema,
    ))
}

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Payload returned by mutating tools until the caller confirms.
fn confirmation_request(action: &str, prompt: &str, preview: Value) -> Result<String, ToolError> {
    let payload = json!({
        "status": "confirmation_required",
        "action": action,
        "preview": preview,
        "message": format!(
            "{} If they agree, call {} again with \"confirmed\": true.",
            prompt, action
        ),
    });
    Ok(serde_json::to_string_pretty(&payload)?)
}

#[derive(Serialize)]
pub struct ListEmailsProps {
    pub status: Property,
}

#[derive(Deserialize)]
pub struct ListEmailsArgs {
    #[serde(default)]
    pub status: Option<EmailStatus>,
}

#[derive(Serialize)]
pub struct ListEmailsTool {
    #[serde(flatten)]
    definition: ToolDefinition<ListEmailsProps>,
    #[serde(skip)]
    client: Arc<ButtondownClient>,
}

#[async_trait]
impl ToolCall for ListEmailsTool {
    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let args: ListEmailsArgs = parse_args(args)?;
        let page = self.client.list_emails(args.status).await?;

        let emails: Vec<Value> = page
            .results
            .iter()
            .map(|email| {
                json!({
                    "id": email.id,
                    "subject": email.subject,
                    "status": email.status,
                    "created": email.creation_date,
                    "scheduled_for": email.scheduled_for,
                    "analytics": email.analytics.as_ref().map(|a| json!({
                        "recipients": a.recipients,
                        "opens": a.opens,
                        "clicks": a.clicks,
                    })),
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&json!({
            "total": page.count,
            "emails": emails,
        }))?)
    }

    fn function_name(&self) -> String {
        self.definition.name.clone()
    }
}

impl ListEmailsTool {
    pub fn new(client: Arc<ButtondownClient>) -> Self {
        let mut status = Property::new("string", "Optional status to filter emails by");
        status.allowed = Some(vec![
            String::from("draft"),
            String::from("scheduled"),
            String::from("sent"),
        ]);
        let definition = ToolDefinition::new(
            "list_emails",
            "List all emails, optionally filtered by status (draft, scheduled, sent)",
            ListEmailsProps { status },
            &[],
        );
        Self { definition, client }
    }
}

#[derive(Serialize)]
pub struct CreateDraftProps {
    pub content: Property,
    pub title: Property,
    pub confirmed: Property,
}

#[derive(Deserialize)]
pub struct CreateDraftArgs {
    pub content: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Serialize)]
pub struct CreateDraftTool {
    #[serde(flatten)]
    definition: ToolDefinition<CreateDraftProps>,
    #[serde(skip)]
    client: Arc<ButtondownClient>,
}

#[async_trait]
impl ToolCall for CreateDraftTool {
    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let args: CreateDraftArgs = parse_args(args)?;

        if !args.confirmed {
            return confirmation_request(
                "create_draft",
                "Please ask the user if they want to create this draft.",
                json!({
                    "title": args.title.as_deref().unwrap_or(buttondown::client::UNTITLED_DRAFT),
                    "content_length": args.content.chars().count(),
                }),
            );
        }

        let email = self
            .client
            .create_draft(&args.content, args.title.as_deref())
            .await?;
        tracing::info!("Created draft {}", email.id);
        Ok(serde_json::to_string_pretty(&email)?)
    }

    fn function_name(&self) -> String {
        self.definition.name.clone()
    }
}

impl CreateDraftTool {
    pub fn new(client: Arc<ButtondownClient>) -> Self {
        let definition = ToolDefinition::new(
            "create_draft",
            "Create a new email draft in Buttondown with the specified content and optional title",
            CreateDraftProps {
                content: Property::new("string", "The main content/body of the email draft"),
                title: Property::new("string", "Optional title/subject for the email draft"),
                confirmed: Property::new(
                    "boolean",
                    "Set to true only after the user has approved creating the draft",
                ),
            },
            &["content"],
        );
        Self { definition, client }
    }
}

#[derive(Serialize)]
pub struct GetAnalyticsProps {
    #[serde(rename = "draftId")]
    pub draft_id: Property,
}

#[derive(Deserialize)]
pub struct GetAnalyticsArgs {
    #[serde(rename = "draftId")]
    pub draft_id: String,
}

#[derive(Serialize)]
pub struct GetAnalyticsTool {
    #[serde(flatten)]
    definition: ToolDefinition<GetAnalyticsProps>,
    #[serde(skip)]
    client: Arc<ButtondownClient>,
}

#[async_trait]
impl ToolCall for GetAnalyticsTool {
    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let args: GetAnalyticsArgs = parse_args(args)?;
        // Analytics ride along on the email itself
        let email = self.client.get_email(&args.draft_id).await?;
        Ok(serde_json::to_string_pretty(&email.analytics)?)
    }

    fn function_name(&self) -> String {
        self.definition.name.clone()
    }
}

impl GetAnalyticsTool {
    pub fn new(client: Arc<ButtondownClient>) -> Self {
        let definition = ToolDefinition::new(
            "get_analytics",
            "Retrieve analytics data for a specific email draft from Buttondown",
            GetAnalyticsProps {
                draft_id: Property::new(
                    "string",
                    "The ID of the email draft to get analytics for",
                ),
            },
            &["draftId"],
        );
        Self { definition, client }
    }
}

#[derive(Serialize)]
pub struct ScheduleDraftProps {
    #[serde(rename = "draftId")]
    pub draft_id: Property,
    #[serde(rename = "scheduledTime")]
    pub scheduled_time: Property,
    pub confirmed: Property,
}

#[derive(Deserialize)]
pub struct ScheduleDraftArgs {
    #[serde(rename = "draftId")]
    pub draft_id: String,
    #[serde(rename = "scheduledTime")]
    pub scheduled_time: String,
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Serialize)]
pub struct ScheduleDraftTool {
    #[serde(flatten)]
    definition: ToolDefinition<ScheduleDraftProps>,
    #[serde(skip)]
    client: Arc<ButtondownClient>,
}

#[async_trait]
impl ToolCall for ScheduleDraftTool {
    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let args: ScheduleDraftArgs = parse_args(args)?;

        if !args.confirmed {
            return confirmation_request(
                "schedule_draft",
                "Please ask the user if they want to schedule this draft.",
                json!({
                    "draftId": args.draft_id,
                    "scheduledTime": args.scheduled_time,
                }),
            );
        }

        let email = self
            .client
            .schedule_email(&args.draft_id, &args.scheduled_time)
            .await?;
        tracing::info!("Scheduled {} for {}", email.id, args.scheduled_time);
        Ok(serde_json::to_string_pretty(&email)?)
    }

    fn function_name(&self) -> String {
        self.definition.name.clone()
    }
}

impl ScheduleDraftTool {
    pub fn new(client: Arc<ButtondownClient>) -> Self {
        let definition = ToolDefinition::new(
            "schedule_draft",
            "Schedule an existing email draft to be sent at a specific time",
            ScheduleDraftProps {
                draft_id: Property::new("string", "The ID of the email draft to schedule"),
                scheduled_time: Property::new(
                    "string",
                    "When to send the email (ISO 8601 datetime format)",
                ),
                confirmed: Property::new(
                    "boolean",
                    "Set to true only after the user has approved the schedule",
                ),
            },
            &["draftId", "scheduledTime"],
        );
        Self { definition, client }
    }
}

/// All tools exposed by the server, sharing one client.
pub fn all(client: ButtondownClient) -> Vec<BoxedToolCall> {
    let client = Arc::new(client);
    vec![
        Box::new(ListEmailsTool::new(Arc::clone(&client))),
        Box::new(CreateDraftTool::new(Arc::clone(&client))),
        Box::new(GetAnalyticsTool::new(Arc::clone(&client))),
        Box::new(ScheduleDraftTool::new(client)),
    ]
}
