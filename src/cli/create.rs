use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::client;
use crate::core::AppConfig;

/// A draft read from a markdown file with optional front matter.
#[derive(Debug, PartialEq)]
pub struct MarkdownDraft {
    pub title: Option<String>,
    pub body: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FrontMatter {
    title: Option<String>,
    subject: Option<String>,
}

/// Split a leading `---` YAML front matter block off of `content` and
/// pick the title from its top level `title` or `subject` key.
pub fn parse_markdown(content: &str) -> Result<MarkdownDraft> {
    let Some((front, body)) = split_front_matter(content) else {
        return Ok(MarkdownDraft {
            title: None,
            body: content.to_string(),
        });
    };

    let front_matter = if front.trim().is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml_ng::from_str::<Option<FrontMatter>>(front)
            .context("Invalid front matter")?
            .unwrap_or_default()
    };

    let title = front_matter
        .title
        .or(front_matter.subject)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    Ok(MarkdownDraft {
        title,
        body: body.trim_start_matches(['\r', '\n']).to_string(),
    })
}

fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

pub fn preview(title: Option<&str>, body: &str) -> String {
    format!(
        "Preview of draft to be created:\nTitle: {}\nContent length: {} characters\n\nPlease ask the user if they want to create this draft. If they agree, run with --confirm",
        title.unwrap_or("Untitled"),
        body.chars().count()
    )
}

pub async fn run(
    config: &AppConfig,
    api_key: Option<&str>,
    file: &Path,
    title: Option<String>,
    confirm: bool,
) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let draft = parse_markdown(&content)?;
    let title = title.or(draft.title);

    if !confirm {
        println!("{}", preview(title.as_deref(), &draft.body));
        return Ok(());
    }

    println!("Creating draft from {}...", file.display());
    let email = client(config, api_key).await?
        .create_draft(&draft.body, title.as_deref())
        .await
        .context("Failed to create draft")?;
    println!("Created draft: {}", email.id);

    Ok(())
}
