use std::path::PathBuf;

use clap::Parser;
use solarkit::cli::{Command, Session};
use solarkit::{init_logging, DesignerConfig, BUILD_DATE, VERSION};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Parser)]
#[command(
    name = "solarkit",
    about = "Solar panel layout designer driven by line commands on stdin",
    version
)]
struct Args {
    /// Configuration file (TOML or JSON). Defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start with the map shown, overriding the configuration.
    #[arg(long)]
    map: bool,

    /// Emit logs as JSON lines.
    #[arg(long = "log-json")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_json)?;
    tracing::info!("SolarKit {} (built {})", VERSION, BUILD_DATE);

    let config_path = match args.config {
        Some(path) => path,
        None => DesignerConfig::config_path()?,
    };
    let mut config = DesignerConfig::load_or_default(&config_path)?;
    if args.map {
        config.map.enabled = true;
    }

    let mut session = Session::from_config(config);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("error: {:#}", e);
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        match session.execute(command).await {
            Ok(output) => println!("{}", output),
            Err(e) => eprintln!("error: {:#}", e),
        }
    }

    Ok(())
}
