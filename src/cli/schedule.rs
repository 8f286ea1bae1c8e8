use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Duration, Local, SecondsFormat, Utc};
use regex::Regex;

use super::client;
use crate::core::AppConfig;

/// Resolve a schedule time to the string sent to the API.
///
/// Relative times (`+30m`, `+2h`, `+1d`, `+1w`) are added to `now` and
/// rendered in UTC. Absolute times must be RFC 3339 and are returned
/// unchanged so the API receives exactly what the user typed.
pub fn resolve_time(input: &str, now: DateTime<Utc>) -> Result<String> {
    let input = input.trim();
    let relative = Regex::new(r"^\+(\d{1,6})([mhdw])$")?;

    if let Some(caps) = relative.captures(input) {
        let amount: i64 = caps[1].parse()?;
        let delta = match &caps[2] {
            "m" => Duration::minutes(amount),
            "h" => Duration::hours(amount),
            "d" => Duration::days(amount),
            _ => Duration::weeks(amount),
        };
        return Ok((now + delta).to_rfc3339_opts(SecondsFormat::Secs, true));
    }

    DateTime::parse_from_rfc3339(input).map_err(|e| {
        anyhow!(
            "Invalid time '{}': {}. Use RFC 3339 (2024-03-27T12:00:00Z) or +30m, +2h, +1d, +1w",
            input,
            e
        )
    })?;

    Ok(input.to_string())
}

pub fn preview(draft_id: &str, scheduled_for: &str) -> Result<String> {
    let local = DateTime::parse_from_rfc3339(scheduled_for)?.with_timezone(&Local);
    Ok(format!(
        "Preview of scheduling:\nDraft ID: {}\nScheduled time: {}\nLocal time: {}\n\nPlease ask the user if they want to schedule this draft. If they agree, run with --confirm",
        draft_id,
        scheduled_for,
        local.format("%Y-%m-%d %H:%M:%S %Z")
    ))
}

pub async fn run(
    config: &AppConfig,
    api_key: Option<&str>,
    draft_id: &str,
    time: &str,
    confirm: bool,
) -> Result<()> {
    let scheduled_for = resolve_time(time, Utc::now())?;

    if !confirm {
        println!("{}", preview(draft_id, &scheduled_for)?);
        return Ok(());
    }

    let email = client(config, api_key).await?
        .schedule_email(draft_id, &scheduled_for)
        .await
        .context("Failed to schedule draft")?;
    println!(
        "Scheduled draft {} for {}",
        email.id,
        email.scheduled_for.as_deref().unwrap_or(&scheduled_for)
    );

    Ok(())
}

pub async fn run_unschedule(
    config: &AppConfig,
    api_key: Option<&str>,
    draft_id: &str,
    confirm: bool,
) -> Result<()> {
    if !confirm {
        println!(
            "Preview of unscheduling:\nDraft ID: {}\n\nThe email will move back to draft. Run with --confirm to proceed",
            draft_id
        );
        return Ok(());
    }

    let email = client(config, api_key).await?
        .unschedule_email(draft_id)
        .await
        .context("Failed to unschedule email")?;
    println!("Moved {} back to {}", email.id, email.status);

    Ok(())
}
