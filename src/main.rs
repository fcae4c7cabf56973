use anyhow::Result;
use clap::Parser;
use herald_core::server::BroadcastServer;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Scheduled chat broadcaster for Minecraft servers.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,

    /// Directory containing Config.toml and the messages document.
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(dir) = &args.config_dir {
        std::env::set_current_dir(dir)?;
    }

    // Setup logging
    let logfile = tracing_appender::rolling::daily("./logs", "herald.log");
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("HERALD_LOG")
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_writer(logfile.and(std::io::stdout))
        .with_env_filter(env_filter)
        .init();

    if args.check {
        BroadcastServer::check()
    } else {
        BroadcastServer::run()
    }
}
