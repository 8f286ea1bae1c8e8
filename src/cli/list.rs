use anyhow::{Context, Result};

use super::client;
use crate::buttondown::{Email, EmailStatus, Page};
use crate::core::AppConfig;

pub fn format_emails(page: &Page<Email>) -> String {
    if page.results.is_empty() {
        return String::from("No emails found.");
    }

    let mut out = format!("Showing {} of {} emails", page.results.len(), page.count);
    for email in &page.results {
        out.push_str(&format!(
            "\n\nID: {}\nSubject: {}\nStatus: {}\nCreated: {}",
            email.id, email.subject, email.status, email.creation_date
        ));
        if let Some(scheduled_for) = &email.scheduled_for {
            out.push_str(&format!("\nScheduled for: {}", scheduled_for));
        }
    }
    if page.has_next() {
        out.push_str("\n\nMore emails are available on the next page.");
    }
    out
}

pub async fn run(
    config: &AppConfig,
    api_key: Option<&str>,
    status: Option<EmailStatus>,
    json: bool,
) -> Result<()> {
    let page = client(config, api_key).await?
        .list_emails(status)
        .await
        .context("Failed to list emails")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        println!("{}", format_emails(&page));
    }

    Ok(())
}
