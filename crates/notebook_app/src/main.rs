mod platform;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = platform::cli::Cli::parse();
    platform::run_app(cli)
}
