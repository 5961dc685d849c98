//! oct CLI: Ansible playbook wiring for origin CI.

use clap::Parser;

fn main() {
    let cli = oct::cli::Cli::parse();
    if let Err(e) = oct::cli::dispatch(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
