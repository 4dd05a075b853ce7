use crate::server;
use clap::{Args, Parser, Subcommand};
use patient_triage::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Patient Triage Assessment",
    about = "Fetch patient records, score risk, and submit alert lists to the assessment API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a single assessment, print the grading report, and exit
    Run,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Do not run an assessment when the server starts
    #[arg(long)]
    pub(crate) skip_startup_run: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Run => server::run_once().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_flags_parse() {
        let cli = Cli::try_parse_from([
            "patient-triage-api",
            "serve",
            "--port",
            "4000",
            "--skip-startup-run",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.port, Some(4000));
                assert!(args.host.is_none());
                assert!(args.skip_startup_run);
            }
            other => panic!("expected serve command, got {other:?}"),
        }
    }

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["patient-triage-api"]).expect("arguments parse");
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["patient-triage-api", "run"]).expect("arguments parse");
        assert!(matches!(cli.command, Some(Command::Run)));
    }
}
