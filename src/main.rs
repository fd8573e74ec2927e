use clap::Parser;
use tracing_subscriber::EnvFilter;

use babel_translate_lib::commands::Cli;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = babel_translate_lib::run(cli).await {
        eprintln!("error: {}", e.user_message());
        std::process::exit(1);
    }
}
