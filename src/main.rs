use clap::{
    Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};

use chartlist::{config, error, server};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Port to listen on, overrides PORT
    #[clap(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    config::load_env();
    let cli = Cli::parse();

    let mut settings = match config::Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    };
    if let Some(port) = cli.port {
        settings.port = port;
    }

    if let Err(e) = server::start_server(settings).await {
        error!("Server stopped: {}", e);
    }
}
