mod cli;

use clap::Parser;
use color_eyre::Result;
use taskdeck::config::Config;
use taskdeck::logging;

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = cli::Args::parse();

  // A bare --url is enough when no config file exists
  let mut config = match (Config::load_if_present(args.config.as_deref())?, &args.url) {
    (Some(config), _) => config,
    (None, Some(url)) => Config::from_url(url.clone()),
    (None, None) => Config::load(None)?,
  };

  // Override the API url if specified on command line
  if let Some(url) = args.url.clone() {
    config.api.url = url;
  }

  let _log_guard = logging::init(&config.log)?;

  cli::run(args, config).await
}
