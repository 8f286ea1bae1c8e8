use anyhow::{Context, Result};

use super::client;
use crate::buttondown::Analytics;
use crate::core::AppConfig;

pub fn format_analytics(email_id: &str, a: &Analytics) -> String {
    let sections: [(&str, Vec<(&str, u64)>); 5] = [
        (
            "Delivery Stats",
            vec![
                ("Recipients", a.recipients),
                ("Deliveries", a.deliveries),
                ("Temporary failures", a.temporary_failures),
                ("Permanent failures", a.permanent_failures),
            ],
        ),
        (
            "Engagement Stats",
            vec![
                ("Opens", a.opens),
                ("Clicks", a.clicks),
                ("Replies", a.replies),
                ("Comments", a.comments),
                ("Social mentions", a.social_mentions),
            ],
        ),
        (
            "Subscriber Impact",
            vec![
                ("New subscriptions", a.subscriptions),
                ("Paid subscriptions", a.paid_subscriptions),
                ("Unsubscriptions", a.unsubscriptions),
                ("Complaints", a.complaints),
            ],
        ),
        (
            "Page Views",
            vec![
                ("Last 7 days", a.page_views_7),
                ("Last 30 days", a.page_views_30),
                ("Lifetime", a.page_views_lifetime),
            ],
        ),
        (
            "Other",
            vec![
                ("Survey responses", a.survey_responses),
                ("Webmentions", a.webmentions),
            ],
        ),
    ];

    let mut out = format!("Analytics for {}:", email_id);
    for (heading, rows) in sections {
        out.push_str(&format!("\n\n{}:", heading));
        for (label, value) in rows {
            out.push_str(&format!("\n- {}: {}", label, value));
        }
    }
    out
}

pub async fn run(config: &AppConfig, api_key: Option<&str>, email_id: &str, json: bool) -> Result<()> {
    let analytics = client(config, api_key).await?
        .get_analytics(email_id)
        .await
        .context("Failed to get analytics")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analytics)?);
    } else {
        println!("{}", format_analytics(email_id, &analytics));
    }

    Ok(())
}
