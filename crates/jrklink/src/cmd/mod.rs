use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use jrklink_poller::Poller;

use crate::exit::CliResult;

pub mod motor;
pub mod query;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Poll the full read-query suite until interrupted.
    Watch(WatchArgs),
    /// Send selected read queries once and print the replies.
    Query(QueryArgs),
    /// Set the controller target (0 to 4095).
    SetTarget(SetTargetArgs),
    /// Turn the motor off.
    Off(OffArgs),
}

pub fn run(command: Command) -> CliResult<i32> {
    match command {
        Command::Watch(args) => watch::run(args),
        Command::Query(args) => query::run(args),
        Command::SetTarget(args) => motor::set_target(args),
        Command::Off(args) => motor::off(args),
    }
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Serial device path (e.g. /dev/ttyACM0).
    pub device: PathBuf,
    /// Milliseconds between query suites.
    #[arg(long, default_value_t = 500)]
    pub interval_ms: u64,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Serial device path (e.g. /dev/ttyACM0).
    pub device: PathBuf,
    /// Variables to read. Default: the full suite.
    #[arg(value_enum)]
    pub vars: Vec<Var>,
    /// Milliseconds to wait for replies to drain before exiting.
    #[arg(long, default_value_t = 250)]
    pub settle_ms: u64,
}

#[derive(Args, Debug)]
pub struct SetTargetArgs {
    /// Serial device path (e.g. /dev/ttyACM0).
    pub device: PathBuf,
    /// Target value, 0 to 4095.
    pub target: u16,
}

#[derive(Args, Debug)]
pub struct OffArgs {
    /// Serial device path (e.g. /dev/ttyACM0).
    pub device: PathBuf,
}

/// Readable variables, one per query opcode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Var {
    Input,
    Target,
    Feedback,
    ScaledFeedback,
    ErrorSum,
    DutyCycleTarget,
    DutyCycle,
    Current,
    Errors,
}

impl Var {
    /// The full suite, in the order the watch loop sends it.
    pub const ALL: [Var; 9] = [
        Var::Input,
        Var::Target,
        Var::Feedback,
        Var::ScaledFeedback,
        Var::ErrorSum,
        Var::DutyCycleTarget,
        Var::DutyCycle,
        Var::Current,
        Var::Errors,
    ];

    /// Send the matching read query.
    pub fn request(self, poller: &Poller) {
        match self {
            Var::Input => poller.read_input(),
            Var::Target => poller.read_target(),
            Var::Feedback => poller.read_feedback(),
            Var::ScaledFeedback => poller.read_scaled_feedback(),
            Var::ErrorSum => poller.read_error_sum(),
            Var::DutyCycleTarget => poller.read_duty_cycle_target(),
            Var::DutyCycle => poller.read_duty_cycle(),
            Var::Current => poller.read_current(),
            Var::Errors => poller.read_errors(),
        }
    }
}
