mod args;

use args::Cli;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();
    let cli = Cli::parse();
    match doc2md::convert_file(&cli.source, cli.target.as_deref()) {
        Ok(_) => info!("conversion complete"),
        Err(err) => {
            error!("conversion failed: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
