use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::debug;

use jrklink_poller::Poller;

use crate::cmd::{Var, WatchArgs};
use crate::exit::{open_error, CliError, CliResult, FAILURE, SUCCESS};

pub fn run(args: WatchArgs) -> CliResult<i32> {
    let poller = Arc::new(
        Poller::open(&args.device, None)
            .map_err(|err| open_error("opening device", err))?,
    );

    let running = Arc::new(AtomicBool::new(true));
    {
        let poller = Arc::clone(&poller);
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
            poller.stop_polling();
        })
        .map_err(|err| CliError::new(FAILURE, format!("installing signal handler: {err}")))?;
    }

    let loop_thread = {
        let poller = Arc::clone(&poller);
        thread::spawn(move || poller.run())
    };

    let interval = Duration::from_millis(args.interval_ms);
    while running.load(Ordering::SeqCst) {
        for var in Var::ALL {
            var.request(&poller);
        }
        debug!("sent query suite");
        thread::sleep(interval);
    }

    loop_thread
        .join()
        .map_err(|_| CliError::new(FAILURE, "event loop thread panicked"))?;
    Ok(SUCCESS)
}
