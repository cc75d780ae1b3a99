//! Tidemark CLI - versioned SQL schema migrations

use clap::Parser;

mod cli;
mod commands;
mod context;
mod output;

use cli::Cli;
use commands::common::ExitCode;
use commands::{migrate, new, plan, status, validate};
use output::OutputStyle;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.log_level);
    let style = OutputStyle::from_global(&cli.global);

    // Runs on a worker thread so it fires even while a paused run blocks on stdin.
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("{}", style.error("interrupted"));
            std::process::exit(1);
        }
    });

    let result = match &cli.command {
        cli::Commands::Migrate(args) => migrate::execute(args, &cli.global, style).await,
        cli::Commands::Plan(args) => plan::execute(args, &cli.global, style).await,
        cli::Commands::New(args) => new::execute(args, &cli.global, style).await,
        cli::Commands::Status(args) => status::execute(args, &cli.global, style).await,
        cli::Commands::Validate(args) => validate::execute(args, &cli.global, style).await,
    };

    if let Err(err) = result {
        let code = match err.downcast_ref::<ExitCode>() {
            Some(ExitCode(code)) => *code,
            None => {
                eprintln!("{} {:#}", style.error("error:"), err);
                1
            }
        };
        std::process::exit(code);
    }
}

/// `--log-level` 0/1/2 maps to warn/info/debug; `RUST_LOG` wins when set.
fn init_logging(level: u8) {
    let filter = match level {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .init();
}
