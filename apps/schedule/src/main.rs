use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_client_settings, ResponseOrdering, SchedulePage, ScheduleView, ScrollControl,
    ScrollRequest,
};
use schedule_render::ScheduleMarkup;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod input;

use input::{parse_line, InputEvent};

#[derive(Parser, Debug)]
#[command(about = "Conference schedule client")]
struct Cli {
    /// Schedule API base URL; defaults to SCHEDULE_SERVER_URL or the local server.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    debounce_ms: Option<u64>,
    /// Render every search response as it arrives instead of only the latest.
    #[arg(long)]
    arrival_order: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch all talks and render the schedule once.
    Render {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Load the schedule, run one search and render its results.
    Search {
        #[arg(long, default_value = "")]
        q: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Drive the page from stdin: `q <text>`, `category <tag>`,
    /// `scroll <offset>`, `top`, `quit`.
    Interactive {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Writes each rendered schedule to a file, or to stdout.
struct MarkupSink {
    output: Option<PathBuf>,
}

impl ScheduleView for MarkupSink {
    fn show_schedule(&self, markup: &ScheduleMarkup) {
        info!(cards = markup.card_count, "schedule: rendered");
        match &self.output {
            Some(path) => {
                if let Err(error) = std::fs::write(path, &markup.html) {
                    warn!(%error, path = %path.display(), "schedule: failed to write markup");
                }
            }
            None => println!("{}", markup.html),
        }
    }
}

struct TerminalScroll;

impl ScrollControl for TerminalScroll {
    fn set_visible(&self, visible: bool) {
        eprintln!("scroll-to-top: {}", if visible { "shown" } else { "hidden" });
    }

    fn scroll_to(&self, request: ScrollRequest) {
        let motion = if request.smooth { "smooth" } else { "instant" };
        eprintln!("scrolling to {} ({motion})", request.top);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_client_settings();
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    if let Some(ms) = cli.debounce_ms {
        settings.debounce = Duration::from_millis(ms);
    }
    if cli.arrival_order {
        settings.ordering = ResponseOrdering::Arrival;
    }

    let output = match &cli.command {
        Command::Render { output }
        | Command::Search { output, .. }
        | Command::Interactive { output } => output.clone(),
    };
    let view = Arc::new(MarkupSink { output });
    let scroll: Arc<dyn ScrollControl> = Arc::new(TerminalScroll);
    let page = SchedulePage::connect(&settings, view, Some(scroll))?;

    match cli.command {
        Command::Render { .. } => {
            if let Some(conference) = page.conference().await {
                info!(
                    name = %conference.name,
                    date = %conference.date,
                    location = %conference.location,
                    "schedule: conference"
                );
            }
            if !page.load().await {
                bail!("failed to load the schedule from {}", settings.server_url);
            }
        }
        Command::Search { q, category, .. } => {
            if page.refresh().await.is_none() {
                bail!("failed to load the schedule from {}", settings.server_url);
            }
            page.search().perform_search(&q, &category).await;
        }
        Command::Interactive { .. } => run_interactive(&page).await?,
    }
    Ok(())
}

async fn run_interactive(page: &SchedulePage) -> Result<()> {
    if !page.load().await {
        warn!("schedule: initial load failed; searches will still be attempted");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(InputEvent::Query(text))) => page.on_search_input(text),
            Ok(Some(InputEvent::Category(category))) => page.on_category_change(category),
            Ok(Some(InputEvent::Scroll(offset))) => {
                page.on_scroll(offset);
            }
            Ok(Some(InputEvent::Top)) => page.scroll_to_top(),
            Ok(Some(InputEvent::Quit)) => break,
            Err(error) => eprintln!("{error}"),
        }
    }

    while page.search().is_busy() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    Ok(())
}
