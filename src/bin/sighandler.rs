use std::{
    io::{self, Write},
    process::{self, ExitCode},
};

use fpsig_demos::{
    logger,
    signal::{self, SaFlags, State, DEMO_SIGNAL},
};

fn run<W: Write>(out: &mut W) -> io::Result<()> {
    if let Err(errno) = signal::install(DEMO_SIGNAL, SaFlags::empty()) {
        log::error!("sigaction({DEMO_SIGNAL}) failed: {errno}");
        process::abort();
    }

    writeln!(out, "Raising signal...")?;
    out.flush()?;
    if let Err(errno) = signal::raise(DEMO_SIGNAL) {
        log::error!("raise({DEMO_SIGNAL}) failed: {errno}");
        process::abort();
    }
    writeln!(out, "Raised signal")?;

    match signal::state() {
        State::Signaled(delivery) => writeln!(out, "{delivery}")?,
        State::Unsignaled => {
            log::error!("raise({DEMO_SIGNAL}) returned before the handler ran");
            process::abort();
        }
    }
    out.flush()
}

fn main() -> ExitCode {
    logger::init("sighandler");

    match run(&mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("failed to write to stdout: {err}");
            ExitCode::FAILURE
        }
    }
}
