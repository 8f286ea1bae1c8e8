//! HTTP client for the Buttondown v1 API.
//!
//! Each method is a single request with no retries. A non-success
//! status becomes `Error::RequestFailed` carrying the API's `detail`
//! message, or the status text when the body isn't the expected JSON.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::credentials::ApiKey;
use super::error::{Error, Result};
use super::models::{
    Analytics, ApiErrorBody, CreateEmailRequest, Email, EmailStatus, Interval, Page, Subscriber,
    Tag, TimeseriesAnalytics, TimeseriesResponse, UpdateEmailRequest,
};

pub const DEFAULT_BASE_URL: &str = "https://api.buttondown.email/v1";
pub const UNTITLED_DRAFT: &str = "Untitled Draft";

#[derive(Clone, Debug)]
pub struct ButtondownClient {
    http: Client,
    base_url: String,
    api_key: ApiKey,
}

impl ButtondownClient {
    pub fn new(api_key: ApiKey) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: ApiKey, base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List one page of emails, optionally filtered by status.
    pub async fn list_emails(&self, status: Option<EmailStatus>) -> Result<Page<Email>> {
        match status {
            Some(status) => {
                self.get_json("/emails", &[("status", status.as_str())])
                    .await
            }
            None => self.get_json("/emails", &[]).await,
        }
    }

    pub async fn list_drafts(&self) -> Result<Page<Email>> {
        self.list_emails(Some(EmailStatus::Draft)).await
    }

    pub async fn list_scheduled_emails(&self) -> Result<Page<Email>> {
        self.list_emails(Some(EmailStatus::Scheduled)).await
    }

    pub async fn get_email(&self, id: &str) -> Result<Email> {
        self.get_json(&email_path(id), &[]).await
    }

    /// Create an email. Windows line endings in the body are converted
    /// to `\n` before sending.
    pub async fn create_email(&self, email: &CreateEmailRequest) -> Result<Email> {
        if email.body.trim().is_empty() {
            return Err(Error::InvalidRequest(String::from(
                "An email body is required",
            )));
        }

        let mut email = email.clone();
        email.body = normalize_line_endings(&email.body);

        let resp = self.send(Method::POST, "/emails", &[], Some(&email)).await?;
        decode(resp).await
    }

    /// Create a public draft from markdown content.
    pub async fn create_draft(&self, content: &str, title: Option<&str>) -> Result<Email> {
        let subject = title.filter(|t| !t.is_empty()).unwrap_or(UNTITLED_DRAFT);
        let email = CreateEmailRequest::draft(subject, content).with_email_type("public");
        self.create_email(&email).await
    }

    pub async fn update_email(&self, id: &str, update: &UpdateEmailRequest) -> Result<Email> {
        let resp = self
            .send(Method::PATCH, &email_path(id), &[], Some(update))
            .await?;
        decode(resp).await
    }

    pub async fn delete_email(&self, id: &str) -> Result<()> {
        self.send(Method::DELETE, &email_path(id), &[], None::<&()>)
            .await?;
        Ok(())
    }

    /// Schedule an email. `scheduled_for` is sent exactly as given.
    pub async fn schedule_email(&self, id: &str, scheduled_for: &str) -> Result<Email> {
        self.update_email(id, &UpdateEmailRequest::schedule(scheduled_for))
            .await
    }

    /// Move an email back to draft and clear its schedule.
    pub async fn unschedule_email(&self, id: &str) -> Result<Email> {
        self.update_email(id, &UpdateEmailRequest::unschedule())
            .await
    }

    pub async fn list_subscribers(&self) -> Result<Page<Subscriber>> {
        self.get_json("/subscribers", &[]).await
    }

    pub async fn list_tags(&self) -> Result<Page<Tag>> {
        self.get_json("/tags", &[]).await
    }

    /// Analytics are also embedded in `Email::analytics`; this hits the
    /// dedicated endpoint.
    pub async fn get_analytics(&self, id: &str) -> Result<Analytics> {
        let path = format!("{}/analytics", email_path(id));
        self.get_json(&path, &[]).await
    }

    pub async fn timeseries_analytics(
        &self,
        start_date: &str,
        end_date: &str,
        interval: Interval,
    ) -> Result<TimeseriesAnalytics> {
        let resp: TimeseriesResponse = self
            .get_json(
                "/analytics/timeseries",
                &[
                    ("start_date", start_date),
                    ("end_date", end_date),
                    ("interval", interval.as_str()),
                ],
            )
            .await?;
        Ok(resp.analytics)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let resp = self.send(Method::GET, path, query, None::<&()>).await?;
        decode(resp).await
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, path);

        let mut req = self
            .http
            .request(method, &url)
            .header(AUTHORIZATION, format!("Token {}", self.api_key.expose()))
            .header(CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = error_message(status, &text);
            tracing::debug!("{} returned {}: {}", path, status, message);
            return Err(Error::RequestFailed { message });
        }

        Ok(resp)
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let text = resp.text().await?;
    Ok(serde_json::from_str(&text)?)
}

fn email_path(id: &str) -> String {
    format!("/emails/{}", urlencoding::encode(id))
}

fn normalize_line_endings(body: &str) -> String {
    body.replace("\r\n", "\n")
}

/// Prefer the API's `detail` message, otherwise the status text.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_str().to_string())
        })
}
