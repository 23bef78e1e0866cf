//! Report generation.
//!
//! Renders a resolved profile as a Markdown document, a JSON document, or
//! a boxed summary for the terminal. Rendering never fills in data; the
//! record arrives complete.

use crate::cli::OutputFormat;
use crate::config::ReportConfig;
use crate::models::{ProfileRecord, Report, ReportMetadata};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// What the renderer produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Report written to this path.
    File(PathBuf),
    /// Report shown in the terminal.
    Dialog,
}

/// Default report file name, e.g. `Foo_BGC_Report.md`.
pub fn default_file_name(username: &str, format: OutputFormat) -> Option<String> {
    let safe: String = username
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format
        .extension()
        .map(|ext| format!("{}_BGC_Report.{}", safe, ext))
}

/// Render `report` in `format`, writing a file for the file formats.
///
/// `output` overrides the default `<dir>/<username>_BGC_Report.<ext>` path.
pub fn render(
    report: &Report,
    format: OutputFormat,
    options: &ReportConfig,
    output_dir: &Path,
    output: Option<&Path>,
) -> Result<Rendered> {
    let content = match format {
        OutputFormat::Markdown => generate_markdown_report(report, options),
        OutputFormat::Json => generate_json_report(report)?,
        OutputFormat::Dialog => {
            println!("{}", generate_dialog(report));
            return Ok(Rendered::Dialog);
        }
    };

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let name = default_file_name(&report.profile.username, format)
                .context("Format has no file representation")?;
            output_dir.join(name)
        }
    };

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    Ok(Rendered::File(path))
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, options: &ReportConfig) -> String {
    let mut output = String::new();
    let profile = &report.profile;

    // Title
    output.push_str(&format!(
        "# {} Background Check Report\n\n",
        report.metadata.platform
    ));

    if let Some(ref avatar) = profile.avatar_url {
        output.push_str(&format!("![Avatar of {}]({})\n\n", profile.username, avatar));
    }

    output.push_str(&generate_request_section(&report.metadata));
    output.push_str(&generate_identity_section(profile));
    output.push_str(&generate_social_section(profile));

    if options.include_groups {
        output.push_str(&generate_groups_section(profile));
    }
    if options.include_badges {
        output.push_str(&generate_badges_section(profile));
    }

    output.push_str(&generate_footer(&report.metadata));

    output
}

/// Generate the request section.
fn generate_request_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Request\n\n");
    section.push_str(&format!("- **Reason:** {}\n", metadata.reason));
    section.push_str(&format!(
        "- **Requested As:** `{}`\n",
        metadata.requested_identifier
    ));
    section.push_str(&format!(
        "- **Generated:** {}\n\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    section
}

/// Generate the identity section.
fn generate_identity_section(profile: &ProfileRecord) -> String {
    let mut section = String::new();

    section.push_str("## Identity\n\n");
    section.push_str("| Field | Value |\n");
    section.push_str("|:---|:---|\n");
    section.push_str(&format!("| ID | [{}]({}) |\n", profile.id, profile.profile_url()));
    section.push_str(&format!("| Username | {} |\n", profile.username));
    section.push_str(&format!("| Display Name | {} |\n", profile.display_name));
    section.push_str(&format!(
        "| Created | {} |\n",
        profile.created.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "| Banned | {} |\n",
        if profile.banned { "⛔ Yes" } else { "No" }
    ));

    let status = match profile.presence.status {
        Some(status) => format!("{} {}", status.emoji(), status),
        None => "Unknown".to_string(),
    };
    section.push_str(&format!("| Presence | {} |\n", status));
    if let Some(ref location) = profile.presence.last_location {
        section.push_str(&format!("| Last Location | {} |\n", location));
    }
    if let Some(last_online) = profile.presence.last_online {
        section.push_str(&format!(
            "| Last Online | {} |\n",
            last_online.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    section.push('\n');

    section.push_str("### Description\n\n");
    for line in profile.description.lines() {
        section.push_str(&format!("> {}\n", line));
    }
    section.push('\n');

    section
}

/// Generate the social counts section.
fn generate_social_section(profile: &ProfileRecord) -> String {
    let mut section = String::new();

    section.push_str("## Social\n\n");
    section.push_str("| Connections | Friends | Followers | Following | Groups | Badges | Favorites |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| **{}** | {} | {} | {} | {} | {} | {} |\n\n",
        profile.connections(),
        profile.friends_count,
        profile.followers_count,
        profile.following_count,
        profile.groups_count(),
        profile.badges_count(),
        profile.favorites_count
    ));

    section
}

/// Generate the groups section.
fn generate_groups_section(profile: &ProfileRecord) -> String {
    let mut section = String::new();

    section.push_str("## Groups\n\n");

    if profile.groups.is_empty() {
        section.push_str("No groups.\n\n");
        return section;
    }

    section.push_str("| Group | Role | Rank | Members |\n");
    section.push_str("|:---|:---|:---:|:---:|\n");

    let mut groups: Vec<_> = profile.groups.iter().collect();
    groups.sort_by_key(|g| std::cmp::Reverse(g.rank));

    for group in groups {
        section.push_str(&format!(
            "| {} (`{}`) | {} | {} | {} |\n",
            group.group_name, group.group_id, group.role_name, group.rank, group.member_count
        ));
    }
    section.push('\n');

    section
}

/// Generate the badges section.
fn generate_badges_section(profile: &ProfileRecord) -> String {
    let mut section = String::new();

    section.push_str("## Badges\n\n");

    if profile.badges.is_empty() {
        section.push_str("No badges.\n\n");
        return section;
    }

    for badge in &profile.badges {
        section.push_str(&format!("- {} (`{}`)\n", badge.name, badge.id));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer(metadata: &ReportMetadata) -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by QuickBGC in {:.1}s*\n",
        metadata.duration_seconds
    ));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Generate a boxed terminal summary.
pub fn generate_dialog(report: &Report) -> String {
    let profile = &report.profile;
    let created = profile.created.format("%Y-%m-%d").to_string();
    let presence = profile
        .presence
        .status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    let rows: Vec<(&str, String)> = vec![
        ("Reason", report.metadata.reason.clone()),
        ("ID", profile.id.to_string()),
        ("Username", profile.username.clone()),
        ("Display Name", profile.display_name.clone()),
        ("Created", created),
        ("Banned", profile.banned.to_string()),
        ("Presence", presence),
        ("Connections", profile.connections().to_string()),
        ("Friends", profile.friends_count.to_string()),
        ("Followers", profile.followers_count.to_string()),
        ("Following", profile.following_count.to_string()),
        ("Groups", profile.groups_count().to_string()),
        ("Badges", profile.badges_count().to_string()),
        ("Favorites", profile.favorites_count.to_string()),
        (
            "Avatar",
            profile.avatar_url.clone().unwrap_or_else(|| "None".to_string()),
        ),
        ("Description", first_line(&profile.description)),
    ];

    let title = format!("{} Background Check", report.metadata.platform);
    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let lines: Vec<String> = rows
        .iter()
        .map(|(label, value)| format!("{:<width$}  {}", label, value, width = label_width))
        .collect();
    let inner = lines
        .iter()
        .map(|l| l.chars().count())
        .chain(std::iter::once(title.chars().count()))
        .max()
        .unwrap_or(0);

    let mut dialog = String::new();
    dialog.push_str(&format!("┌{}┐\n", "─".repeat(inner + 2)));
    dialog.push_str(&format!("│ {:<inner$} │\n", title, inner = inner));
    dialog.push_str(&format!("├{}┤\n", "─".repeat(inner + 2)));
    for line in &lines {
        let pad = inner - line.chars().count();
        dialog.push_str(&format!("│ {}{} │\n", line, " ".repeat(pad)));
    }
    dialog.push_str(&format!("└{}┘", "─".repeat(inner + 2)));

    dialog
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or("").to_string()
}
