use std::sync::Arc;
use std::thread;
use std::time::Duration;

use jrklink_poller::Poller;

use crate::cmd::{QueryArgs, Var};
use crate::exit::{open_error, CliError, CliResult, FAILURE, SUCCESS};

pub fn run(args: QueryArgs) -> CliResult<i32> {
    let poller = Arc::new(
        Poller::open(&args.device, None)
            .map_err(|err| open_error("opening device", err))?,
    );

    let loop_thread = {
        let poller = Arc::clone(&poller);
        thread::spawn(move || poller.run())
    };

    let vars: &[Var] = if args.vars.is_empty() {
        &Var::ALL
    } else {
        &args.vars
    };
    for var in vars {
        var.request(&poller);
    }

    // one outstanding suite; give the device a moment to answer
    thread::sleep(Duration::from_millis(args.settle_ms));

    poller.stop_polling();
    loop_thread
        .join()
        .map_err(|_| CliError::new(FAILURE, "event loop thread panicked"))?;
    Ok(SUCCESS)
}
