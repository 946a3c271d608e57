use clap::Subcommand;
use serde_json::json;

use crate::app::AdminApp;
use crate::cli::utils::{
    confirm, format_page_window, output_notice, output_success, print_notice_table, print_stats, read_stdin,
};
use crate::cli::OutputFormat;
use crate::types::{Platform, PlatformFilter};
use crate::view::{NoticeBoard, NoticeForm};

#[derive(Subcommand)]
pub enum NoticeCommands {
    #[command(about = "List notices, optionally filtered by platform")]
    List {
        #[arg(long, default_value = "ALL", help = "ALL, MOBILE or WEB")]
        platform: PlatformFilter,
        #[arg(long, default_value_t = 0, help = "Zero-based page index")]
        page: u32,
        #[arg(long, help = "Page size (defaults to DUTYING_PAGE_SIZE or 10)")]
        size: Option<u32>,
    },

    #[command(about = "Show a single notice")]
    Get {
        #[arg(help = "Notice ID")]
        id: i64,
    },

    #[command(about = "Create a notice (content is read from stdin when --content is omitted)")]
    Create {
        #[arg(long, help = "MOBILE or WEB")]
        platform: Platform,
        #[arg(long, help = "App version, e.g. 1.0.26")]
        version: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: Option<String>,
    },

    #[command(about = "Edit a notice; omitted fields keep their current values")]
    Update {
        #[arg(help = "Notice ID")]
        id: i64,
        #[arg(long)]
        platform: Option<Platform>,
        #[arg(long)]
        version: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },

    #[command(about = "Delete a notice")]
    Delete {
        #[arg(help = "Notice ID")]
        id: i64,
        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}

pub async fn handle(cmd: NoticeCommands, app: &AdminApp, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        NoticeCommands::List { platform, page, size } => {
            let board = match size {
                Some(size) if size > 0 => NoticeBoard::new(app.notices.clone(), size),
                _ => app.notice_board(),
            };
            let mut board = board.with_platform(platform);
            let notices = board.go_to_page(page).await?;
            let stats = board.stats();
            let pagination = board.pagination();

            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "filter": platform,
                            "page": notices.as_ref(),
                            "stats": stats,
                            "pagination": {
                                "current_page": pagination.current_page(),
                                "total_pages": pagination.total_pages(),
                                "window": pagination.window(),
                            },
                        }))?
                    );
                }
                OutputFormat::Text => {
                    println!(
                        "Notices ({}) - page {} of {}",
                        platform.label(),
                        notices.number + 1,
                        notices.total_pages.max(1)
                    );
                    print_notice_table(&notices.content);
                    print_stats(&stats);
                    if let Some(window) = format_page_window(pagination) {
                        println!("{}", window);
                    }
                }
            }
            Ok(())
        }
        NoticeCommands::Get { id } => {
            let notice = app.notices.get(id).await?;
            output_notice(&output_format, &notice)
        }
        NoticeCommands::Create { platform, version, title, content } => {
            let content = match content {
                Some(content) => content,
                None => read_stdin()?,
            };

            let mut form = NoticeForm::create();
            form.set_platform(platform);
            form.set_version(version);
            form.set_title(title);
            form.set_content(content);

            let notice = form.submit(&app.notices).await?;
            output_success(
                &output_format,
                &format!("Notice #{} created", notice.id),
                Some(json!({ "notice": notice })),
            )
        }
        NoticeCommands::Update { id, platform, version, title, content } => {
            let current = app.notices.get(id).await?;

            let mut form = NoticeForm::edit(current.as_ref().clone());
            if let Some(platform) = platform {
                form.set_platform(platform);
            }
            if let Some(version) = version {
                form.set_version(version);
            }
            if let Some(title) = title {
                form.set_title(title);
            }
            if let Some(content) = content {
                form.set_content(content);
            }

            if form.fields() == &current.fields() {
                return output_success(&output_format, &format!("Notice #{} unchanged", id), None);
            }

            let notice = form.submit(&app.notices).await?;
            output_success(
                &output_format,
                &format!("Notice #{} updated", notice.id),
                Some(json!({ "notice": notice })),
            )
        }
        NoticeCommands::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete notice #{}? This cannot be undone.", id))? {
                return output_success(&output_format, "Delete cancelled", None);
            }

            app.notices.delete(id).await?;
            output_success(
                &output_format,
                &format!("Notice #{} deleted", id),
                Some(json!({ "id": id })),
            )
        }
    }
}
