use jrklink_poller::Poller;
use jrklink_proto::MAX_TARGET;

use crate::cmd::{OffArgs, SetTargetArgs};
use crate::exit::{open_error, CliError, CliResult, SUCCESS, USAGE};

pub fn set_target(args: SetTargetArgs) -> CliResult<i32> {
    // reject here so the user gets a usage error instead of a log line
    if args.target > MAX_TARGET {
        return Err(CliError::new(
            USAGE,
            format!("target must be 0..=4095, got {}", args.target),
        ));
    }

    let poller = Poller::open(&args.device, None).map_err(|err| open_error("opening device", err))?;
    poller.set_target(args.target);
    Ok(SUCCESS)
}

pub fn off(args: OffArgs) -> CliResult<i32> {
    let poller = Poller::open(&args.device, None).map_err(|err| open_error("opening device", err))?;
    poller.motor_off();
    Ok(SUCCESS)
}
