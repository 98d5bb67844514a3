// src/bin/cli.rs
use tax_scrape::cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    cli::run()
}
