//! `do-release` entry point.
//!
//! Parses arguments, prints the usage text on bad input, and hands over to
//! [`Cli::execute`]. The exit status is the one the release run reports.

use clap::Parser;
use clap::error::ErrorKind;
use release_agent::cli::{self, Cli};
use release_agent::core::user_friendly_error;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                e.exit();
            }
            print!("{}", cli::usage_text(&cli::program_name()));
            std::process::exit(1);
        }
    };

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
