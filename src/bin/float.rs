use std::{io, process::ExitCode};

use fpsig_demos::{float, logger};

fn main() -> ExitCode {
    logger::init("float");

    match float::report(&mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("failed to write sums: {err}");
            ExitCode::FAILURE
        }
    }
}
