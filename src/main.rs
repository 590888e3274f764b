//! tfcheck - provision, verify and tear down Terraform modules

use clap::Parser;

use tfcheck_cli::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
