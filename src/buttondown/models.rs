//! Request and response shapes for the Buttondown v1 API.
//!
//! Timestamps are kept as the exact strings the API returns so that a
//! value sent to the API comes back byte-for-byte (no timezone
//! normalization happens locally). Free-form fields the API does not
//! document (attachments, metadata, filter entries, templates) are
//! held as `serde_json::Value` and never interpreted here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmailStatus {
    #[default]
    Draft,
    Scheduled,
    AboutToSend,
    Sent,
}

impl EmailStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailStatus::Draft => "draft",
            EmailStatus::Scheduled => "scheduled",
            EmailStatus::AboutToSend => "about_to_send",
            EmailStatus::Sent => "sent",
        }
    }
}

impl fmt::Display for EmailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmailStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(EmailStatus::Draft),
            "scheduled" => Ok(EmailStatus::Scheduled),
            "about_to_send" => Ok(EmailStatus::AboutToSend),
            "sent" => Ok(EmailStatus::Sent),
            other => Err(format!("Unknown email status: {}", other)),
        }
    }
}

/// Secondary ids are numeric on emails but the API has been seen to
/// return strings for subscribers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SecondaryId {
    Number(u64),
    Text(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Analytics {
    pub recipients: u64,
    pub deliveries: u64,
    pub opens: u64,
    pub clicks: u64,
    pub temporary_failures: u64,
    pub permanent_failures: u64,
    pub unsubscriptions: u64,
    pub complaints: u64,
    pub survey_responses: u64,
    pub webmentions: u64,
    #[serde(rename = "page_views__lifetime")]
    pub page_views_lifetime: u64,
    #[serde(rename = "page_views__30")]
    pub page_views_30: u64,
    #[serde(rename = "page_views__7")]
    pub page_views_7: u64,
    pub subscriptions: u64,
    pub paid_subscriptions: u64,
    pub replies: u64,
    pub comments: u64,
    pub social_mentions: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmailFilters {
    pub filters: Vec<Value>,
    pub groups: Vec<Value>,
    pub predicate: String,
}

impl Default for EmailFilters {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            groups: Vec::new(),
            predicate: String::from("and"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Email {
    pub id: String,
    pub creation_date: String,
    pub modification_date: String,
    pub publish_date: Option<String>,
    pub scheduled_for: Option<String>,
    pub attachments: Vec<Value>,
    pub subject: String,
    pub canonical_url: String,
    pub image: String,
    pub description: String,
    pub source: String,
    pub body: String,
    pub secondary_id: Option<SecondaryId>,
    pub email_type: String,
    pub slug: String,
    pub status: EmailStatus,
    pub metadata: Map<String, Value>,
    pub commenting_mode: String,
    pub absolute_url: String,
    pub filters: EmailFilters,
    pub analytics: Option<Analytics>,
    pub template: Option<Value>,
    pub related_email_ids: Vec<String>,
    pub is_comments_disabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Subscriber {
    pub id: String,
    pub email: String,
    pub creation_date: String,
    pub modification_date: String,
    pub metadata: Map<String, Value>,
    pub notes: String,
    pub tags: Vec<String>,
    pub secondary_id: Option<SecondaryId>,
    pub subscriber_type: String,
    pub source: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub description: String,
    pub creation_date: String,
    pub modification_date: String,
    pub subscriber_count: u64,
}

/// One page of a list endpoint. `next` and `previous` are opaque URLs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Payload for `POST /emails`. New emails always start as drafts.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateEmailRequest {
    pub subject: String,
    pub body: String,
    status: EmailStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_type: Option<String>,
}

impl CreateEmailRequest {
    pub fn draft(subject: &str, body: &str) -> Self {
        Self {
            subject: subject.to_string(),
            body: body.to_string(),
            status: EmailStatus::Draft,
            email_type: None,
        }
    }

    pub fn with_email_type(mut self, email_type: &str) -> Self {
        self.email_type = Some(email_type.to_string());
        self
    }
}

/// Payload for `PATCH /emails/{id}`.
///
/// `scheduled_for` has three states: `None` leaves it out of the
/// payload, `Some(None)` sends an explicit `null` to clear the
/// schedule, `Some(Some(t))` sets it.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct UpdateEmailRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EmailStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<Option<String>>,
}

impl UpdateEmailRequest {
    pub fn schedule(scheduled_for: &str) -> Self {
        Self {
            status: Some(EmailStatus::Scheduled),
            scheduled_for: Some(Some(scheduled_for.to_string())),
            ..Default::default()
        }
    }

    pub fn unschedule() -> Self {
        Self {
            status: Some(EmailStatus::Draft),
            scheduled_for: Some(None),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    #[default]
    Day,
    Week,
    Month,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Day => "day",
            Interval::Week => "week",
            Interval::Month => "month",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimeseriesPoint {
    pub date: String,
    pub subscribers: u64,
    pub unsubscribes: u64,
    pub opens: u64,
    pub clicks: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimeseriesAnalytics {
    pub start_date: String,
    pub end_date: String,
    pub interval: Interval,
    pub data: Vec<TimeseriesPoint>,
    pub totals: Analytics,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TimeseriesResponse {
    pub analytics: TimeseriesAnalytics,
}

/// Error body returned by the API on non-success responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub detail: Option<String>,
}
