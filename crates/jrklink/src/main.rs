mod cmd;
mod exit;
mod logging;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(name = "jrklink", version, about = "Pololu Jrk serial poller")]
struct Cli {
    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    match cmd::run(cli.command) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::Var;

    #[test]
    fn parses_watch_subcommand() {
        let cli = Cli::try_parse_from(["jrklink", "watch", "/dev/ttyACM0", "--interval-ms", "100"])
            .expect("watch args should parse");

        match cli.command {
            Command::Watch(args) => {
                assert_eq!(args.device.to_str(), Some("/dev/ttyACM0"));
                assert_eq!(args.interval_ms, 100);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_query_with_variables() {
        let cli = Cli::try_parse_from([
            "jrklink",
            "query",
            "/dev/ttyACM0",
            "target",
            "duty-cycle",
        ])
        .expect("query args should parse");

        match cli.command {
            Command::Query(args) => {
                assert_eq!(args.vars, vec![Var::Target, Var::DutyCycle]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_set_target() {
        let cli = Cli::try_parse_from(["jrklink", "set-target", "/dev/ttyACM0", "2048"])
            .expect("set-target args should parse");
        assert!(matches!(cli.command, Command::SetTarget(_)));
    }

    #[test]
    fn rejects_unknown_variable() {
        Cli::try_parse_from(["jrklink", "query", "/dev/ttyACM0", "warp-drive"])
            .expect_err("unknown variable should fail");
    }

    #[test]
    fn rejects_missing_device() {
        Cli::try_parse_from(["jrklink", "watch"]).expect_err("missing device should fail");
    }
}
