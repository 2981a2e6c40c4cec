use crate::report::{run_preview, run_report, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use school_outcomes::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "School Outcomes Dashboard",
    about = "Serve or print regional school counts against university advancement rates",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP dashboard (default command)
    Serve(ServeArgs),
    /// Print the top or bottom regions by advancement rate
    Report(ReportArgs),
    /// Print the first rows of every source table and the joined row counts
    Preview,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_report(args),
        Command::Preview => run_preview(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use school_outcomes::analysis::RankDirection;
    use school_outcomes::pipeline::SchoolKind;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["school-outcomes-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn report_accepts_dataset_direction_and_limit() {
        let cli = Cli::try_parse_from([
            "school-outcomes-api",
            "report",
            "--dataset",
            "university",
            "--direction",
            "bottom",
            "--limit",
            "5",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Report(args)) => {
                assert_eq!(args.dataset, SchoolKind::University);
                assert_eq!(args.direction, RankDirection::Bottom);
                assert_eq!(args.limit, Some(5));
            }
            other => panic!("expected report command, got {other:?}"),
        }
    }

    #[test]
    fn report_defaults_to_top_high_schools() {
        let cli = Cli::try_parse_from(["school-outcomes-api", "report"]).expect("parses");
        match cli.command {
            Some(Command::Report(args)) => {
                assert_eq!(args.dataset, SchoolKind::HighSchool);
                assert_eq!(args.direction, RankDirection::Top);
                assert!(args.limit.is_none());
            }
            other => panic!("expected report command, got {other:?}"),
        }
    }

    #[test]
    fn unknown_dataset_is_rejected() {
        let result = Cli::try_parse_from([
            "school-outcomes-api",
            "report",
            "--dataset",
            "kindergarten",
        ]);
        assert!(result.is_err());
    }
}
