use std::io;
use std::process::ExitCode;

use clap::Parser;
use recall_cli::render::{color_enabled, Style};
use recall_cli::{logging, Cli, Config, Outcome};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env().with_overrides(cli.deck_dir.clone(), cli.db.clone());
    let _log_guard = logging::init_tracing(&config);
    let span = tracing::info_span!("deck", name = %cli.deck);
    let _entered = span.enter();

    let style = Style {
        color: color_enabled(cli.no_color),
    };
    let stdin = io::stdin();

    match recall_cli::run(&cli, &config, stdin.lock(), io::stdout(), style) {
        Ok(Outcome::Reviewed(report)) if report.aborted => {
            println!("Session ended, {} card(s) reviewed.", report.reviewed);
            ExitCode::SUCCESS
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, exit_code = err.exit_code(), "invocation failed");
            eprintln!("{} {err}", style.error("Error:"));
            ExitCode::from(err.exit_code())
        }
    }
}
