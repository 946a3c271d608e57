use std::io::{self, BufRead, Read, Write};

use chrono::NaiveDateTime;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::types::Notice;
use crate::view::{NoticeStats, Pagination};

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(target)) = (data, response.as_object_mut()) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Print a single notice with all of its fields
pub fn output_notice(output_format: &OutputFormat, notice: &Notice) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "notice": notice }))?);
        }
        OutputFormat::Text => {
            println!("#{} {}", notice.id, notice.title);
            println!("Platform: {}  Version: {}  Views: {}", notice.platform, notice.version, notice.view_count);
            println!("Created: {}  Modified: {}", format_date(&notice.created_at), format_date(&notice.modified_at));
            println!();
            println!("{}", notice.content);
        }
    }
    Ok(())
}

const DATE_FORMAT: &str = "%Y.%m.%d %H:%M";

fn format_date(at: &NaiveDateTime) -> String {
    at.format(DATE_FORMAT).to_string()
}

/// Table of notices as shown on the list screen
pub fn print_notice_table(notices: &[Notice]) {
    if notices.is_empty() {
        println!("No notices found");
        return;
    }

    let title_width = notices
        .iter()
        .map(|n| n.title.chars().count())
        .max()
        .unwrap_or(5)
        .clamp(5, 48);

    println!(
        "{:>6}  {:<8}  {:<10}  {:>7}  {:<16}  {}",
        "ID", "PLATFORM", "VERSION", "VIEWS", "CREATED", "TITLE"
    );
    for notice in notices {
        println!(
            "{:>6}  {:<8}  {:<10}  {:>7}  {:<16}  {}",
            notice.id,
            notice.platform,
            notice.version,
            notice.view_count,
            format_date(&notice.created_at),
            truncate(&notice.title, title_width)
        );
    }
}

pub fn print_stats(stats: &NoticeStats) {
    println!(
        "Total: {}  (this page: {}, mobile: {}, web: {}, views: {})",
        stats.total, stats.on_page, stats.mobile, stats.web, stats.total_views
    );
}

/// One-line page selector, e.g. `< 3 4 [5] 6 7 ... 10 >`
pub fn format_page_window(pagination: &Pagination) -> Option<String> {
    if !pagination.is_visible() {
        return None;
    }

    let window = pagination.window();
    let mut parts = Vec::new();
    parts.push(if pagination.can_prev() { "<" } else { " " }.to_string());
    for page in &window.pages {
        if *page == pagination.current_page() {
            parts.push(format!("[{}]", page + 1));
        } else {
            parts.push((page + 1).to_string());
        }
    }
    if let Some(last) = window.trailing_last {
        parts.push("...".to_string());
        parts.push((last + 1).to_string());
    }
    parts.push(if pagination.can_next() { ">" } else { " " }.to_string());

    Some(parts.join(" ").trim().to_string())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Read the whole of stdin, trimming the trailing newline
pub fn read_stdin() -> anyhow::Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
}

/// Ask a yes/no question on the terminal; anything but y/yes is a no
pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    eprint!("{} [y/N] ", prompt);
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
