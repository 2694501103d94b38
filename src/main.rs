#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! jkl — read JMX MBean attributes from the command line.

mod cli;
mod commands;
mod jmx;
mod query;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, OutputCtx, write_error};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout and succeed; usage errors exit 1.
            let code = i32::from(err.use_stderr());
            let _ = err.print();
            std::process::exit(code);
        }
    };

    init_tracing(cli.debug);

    let ctx = OutputCtx::new(cli.output, cli.use_tab, cli.show_keys, cli.debug);

    if let Err(err) = commands::dispatch(&cli, &ctx) {
        write_error(&err);
        std::process::exit(err.exit_code());
    }
}

/// Log to stderr. `--debug` forces debug level for this crate, otherwise
/// `RUST_LOG` decides and the default is errors only.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("jkl=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
