use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use team_api::{HttpTeamApi, MockTeamApi, TeamApi};
use team_console::config::DashboardConfig;
use team_console::{console, logging, render_once, ViewKind};
use team_views::Osc52Clipboard;

#[derive(Parser)]
#[command(name = "team-dashboard", version, about = "Referral code and team hierarchy dashboard")]
struct Cli {
    /// Path to the config file.
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// Base URL of the team service, e.g. `https://team.example.com/api`.
    #[arg(long)]
    api_url: Option<String>,
    /// Use built-in sample data instead of the team service.
    #[arg(long)]
    demo: bool,
    /// Commands. Defaults to the interactive console.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive console.
    Console,
    /// Load one view and print it as text.
    Print {
        #[arg(value_enum)]
        view: ViewKind,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    config.apply_env();
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    let (api, source): (Arc<dyn TeamApi>, String) = if cli.demo {
        (Arc::new(MockTeamApi::demo()), "demo".to_string())
    } else {
        let api = HttpTeamApi::new(&config.api.base_url, config.api.token.clone(), config.api.timeout())?;
        let source = api.base_url().to_string();
        (Arc::new(api), source)
    };

    match cli.command.unwrap_or(Command::Console) {
        Command::Print { view } => {
            logging::init_stderr(&config.logging)?;
            tracing::info!(source = %source, ?view, "Rendering view");
            let text = render_once(api, view, config.tree.options()).await;
            println!("{text}");
        }
        Command::Console => {
            let log_path = config.logging.console_log_path();
            logging::init_file(&config.logging, &log_path)?;
            console::run_console(api, Arc::new(Osc52Clipboard), config.tree.options(), source).await?;
        }
    }

    Ok(())
}
