use clap::{ArgGroup, Parser, Subcommand};
use anyhow::{anyhow, Result};
use std::process::ExitCode;
use std::sync::Arc;
use newslens_rs::{
  config::{Config, API_URL_ENV, DEFAULT_ADDR, DEFAULT_API_URL},
  gateway::Analyzer,
  render,
  server::{self, AppState, ABOUT_TEXT},
  session::{Session, Status},
  theme::{Palette, Theme, Typography},
  types::InputMode,
};

#[derive(Parser)]
#[command(name="newslens", version, about="Check a news item against the analysis service")]
struct Cli {
  #[command(subcommand)]
  cmd: Cmd,
  /// Base URL of the analysis service
  #[arg(long, global=true, env=API_URL_ENV, default_value=DEFAULT_API_URL)] api_url: String,
  #[arg(long, global=true, value_enum, default_value_t=Palette::Neon)] theme: Palette,
  #[arg(long, global=true, value_enum, default_value_t=Typography::Display)] typography: Typography,
  /// Used when RUST_LOG is not set
  #[arg(long, global=true, default_value="warn")] log_level: String,
}

#[derive(Subcommand)]
enum Cmd {
  /// Analyze one news item given by URL, title or content
  #[command(group(ArgGroup::new("input").required(true).args(["url", "title", "content"])))]
  Analyze { #[arg(long)] url: Option<String>, #[arg(long)] title: Option<String>, #[arg(long)] content: Option<String>, #[arg(long)] json: bool },
  /// Serve the home, about and analyzer views
  Serve { #[arg(long, default_value=DEFAULT_ADDR)] addr: String },
  About,
}

fn init_tracing(level: &str) {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
    )
    .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
  let cli = Cli::parse();
  init_tracing(&cli.log_level);
  let config = Config { api_url: cli.api_url, theme: Theme::new(cli.theme, cli.typography) };

  match cli.cmd {
    Cmd::Analyze { url, title, content, json } => {
      let (mode, text) = [(InputMode::Url, url), (InputMode::Title, title), (InputMode::Content, content)]
        .into_iter()
        .find_map(|(m, v)| v.map(|v| (m, v)))
        .ok_or_else(|| anyhow!("one of --url, --title or --content is required"))?;
      analyze(&config, mode, text, json).await
    }
    Cmd::Serve { addr } => {
      let analyzer: Arc<dyn Analyzer> = Arc::new(config.gateway());
      server::run_server(AppState::new(analyzer, config.theme), &addr).await?;
      Ok(ExitCode::SUCCESS)
    }
    Cmd::About => {
      println!("{ABOUT_TEXT}");
      Ok(ExitCode::SUCCESS)
    }
  }
}

async fn analyze(config: &Config, mode: InputMode, text: String, json: bool) -> Result<ExitCode> {
  let gateway = config.gateway();
  let mut session = Session::new();
  session.select_mode(mode);
  session.set_input(mode, text);

  let status = match session.submit(&gateway).await {
    Ok(status) => status.clone(),
    Err(err) => Status::Error(err.to_string()),
  };
  match status {
    Status::Success(report) => {
      if json { println!("{}", render::to_json(&report)?); } else { print!("{}", render::report_text(&report)); }
      Ok(ExitCode::SUCCESS)
    }
    Status::Error(msg) => {
      if json { println!("{}", render::error_json(&msg)?); }
      eprintln!("error: {msg}");
      Ok(ExitCode::FAILURE)
    }
    Status::Idle | Status::Loading => Ok(ExitCode::FAILURE),
  }
}
