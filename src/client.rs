/// Wire model and HTTP client for the WATI conversation-filter endpoint.
///
/// One endpoint, `POST /api/v1/conversations/filter`, accepting the same JSON
/// body the dashboard sends and returning `{ "result": { "items": [...] } }`.
/// Pagination is cursor-based: `lastId` carries the `id` of the last item of
/// the previous page, or null for the first page.
///
/// The request side mirrors the dashboard payload field-for-field (most of it
/// fixed values); the response side is deserialized leniently — every field
/// defaults, unknown fields are ignored — because the upstream schema is
/// undocumented and shifts between releases.
use eyre::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Conversation-filter URL of the hosted instance this tool was built against.
pub const DEFAULT_ENDPOINT: &str =
    "https://live-mt-server.wati.io/444/api/v1/conversations/filter";

/// Items requested per page. The dashboard uses 50; larger values are not
/// honored by the upstream.
const PAGE_SIZE: u32 = 50;

// ---------------------------------------------------------------------------
// Request body
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FilterRequest<'a> {
    filter_type: u32,
    filter_channel_ids: Vec<String>,
    channel_type: u32,
    filter_attribute: Vec<FilterAttribute>,
    filter_topic_names: &'a [String],
    filter_assignee: Vec<String>,
    filter_status: Vec<String>,
    filter_teams: Vec<String>,
    search_string: String,
    search_option_type: u32,
    page_size: u32,
    last_id: Option<&'a str>,
    show_spinner: bool,
    over_view_model: Option<Value>,
    old_chats_first: bool,
    last_conversation: Option<Value>,
    version: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FilterAttribute {
    filter_type: u32,
    name: String,
    operator: String,
    value: String,
}

impl<'a> FilterRequest<'a> {
    fn new(topics: &'a [String], cursor: Option<&'a str>) -> Self {
        Self {
            filter_type: 0,
            filter_channel_ids: vec![String::new()],
            channel_type: 0,
            filter_attribute: vec![FilterAttribute {
                filter_type: 4,
                name: String::new(),
                operator: String::new(),
                value: String::new(),
            }],
            filter_topic_names: topics,
            filter_assignee: Vec::new(),
            filter_status: Vec::new(),
            filter_teams: Vec::new(),
            search_string: String::new(),
            search_option_type: 0,
            page_size: PAGE_SIZE,
            last_id: cursor,
            show_spinner: true,
            over_view_model: None,
            old_chats_first: false,
            last_conversation: None,
            version: "v2".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Response body
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct FilterResponse {
    #[serde(default)]
    result: FilterResult,
}

#[derive(Debug, Default, Deserialize)]
struct FilterResult {
    #[serde(default)]
    items: Vec<ConversationItem>,
}

/// One conversation as returned by the filter endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationItem {
    /// Cursor for the page after this item. Observed missing on some rows;
    /// a page whose last item has no id ends the pagination.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub whatsapp_id: String,
    #[serde(default)]
    pub ticket: Option<Ticket>,
    /// Kept as raw JSON; the shape varies and anything unexpected degrades
    /// to empty notes instead of failing the record.
    #[serde(default)]
    pub list_notes: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    #[serde(default)]
    pub assigned_at: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct ConversationClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    topics: Vec<String>,
}

impl ConversationClient {
    pub fn new(endpoint: &str, token: &str, topics: Vec<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .wrap_err("Failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            token: token.to_string(),
            topics,
        })
    }

    /// Fetch one page of conversations. `cursor` is the id of the last item
    /// of the previous page, or `None` for the first page.
    pub async fn fetch_page(&self, cursor: Option<&str>) -> Result<Vec<ConversationItem>> {
        let request = FilterRequest::new(&self.topics, cursor);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&request)
            .send()
            .await
            .wrap_err("Failed to send conversation-filter request")?;

        if !response.status().is_success() {
            bail!("Upstream returned HTTP {}", response.status());
        }

        let page: FilterResponse = response
            .json()
            .await
            .wrap_err("Failed to parse conversation-filter response")?;
        Ok(page.result.items)
    }
}
