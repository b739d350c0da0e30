//! A handler that records the signal it was given, and the calls to arm and trigger it.
//!
//! The recorded message and number live in two process-wide cells. The handler writes them with
//! volatile stores, readers use volatile loads, and compiler fences pin both sides of the
//! delivery so nothing is cached across `raise`. There is a single writer and the write happens
//! before `raise` returns, so no lock is involved.

use core::{
    fmt, mem, ptr,
    sync::atomic::{compiler_fence, Ordering},
};

use bitflags::bitflags;
use libc::c_int;

use crate::{
    error::{cvt, Errno},
    raw_cell::RawCell,
};

pub const DEMO_SIGNAL: c_int = libc::SIGUSR1;
pub const RECEIVED_MESSAGE: &str = "Signal received";

static MESSAGE: RawCell<Option<&'static str>> = RawCell::new(None);
static SIGNAL_NUM: RawCell<c_int> = RawCell::new(0);

bitflags! {
    /// Subset of `sa_flags` that makes sense for a plain `sa_handler`. The `sighandler` binary
    /// installs with the empty set; the others are for library callers of [`install`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SaFlags: c_int {
        const RESTART = libc::SA_RESTART;
        const NODEFER = libc::SA_NODEFER;
        const RESETHAND = libc::SA_RESETHAND;
    }
}

/// What the handler left behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub message: &'static str,
    pub signo: c_int,
}

impl fmt::Display for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message, self.signo)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Unsignaled,
    Signaled(Delivery),
}

extern "C" fn record_delivery(sig: c_int) {
    // Only async-signal-safe work in here: two stores, no locks, no allocation.
    unsafe {
        MESSAGE.volatile_set(Some(RECEIVED_MESSAGE));
        SIGNAL_NUM.volatile_set(sig);
    }
    compiler_fence(Ordering::SeqCst);
}

/// Registers the recording handler for `sig`. It stays installed until the process exits.
pub fn install(sig: c_int, flags: SaFlags) -> Result<(), Errno> {
    // SAFETY: all-zero is a valid sigaction (SIG_DFL, empty mask, no flags).
    let mut sa: libc::sigaction = unsafe { mem::zeroed() };
    sa.sa_sigaction = record_delivery as extern "C" fn(c_int) as libc::sighandler_t;
    sa.sa_flags = flags.bits();
    cvt(unsafe { libc::sigemptyset(&mut sa.sa_mask) })?;
    cvt(unsafe { libc::sigaction(sig, &sa, ptr::null_mut()) })?;

    log::debug!("handler installed for signal {sig} with {flags:?}");
    Ok(())
}

/// Sends `sig` to the calling thread. Any handler has completed by the time this returns.
pub fn raise(sig: c_int) -> Result<(), Errno> {
    compiler_fence(Ordering::SeqCst);
    let ret = unsafe { libc::raise(sig) };
    compiler_fence(Ordering::SeqCst);

    // raise reports failure as any nonzero value, not only -1.
    if ret != 0 {
        return Err(Errno::last());
    }
    log::trace!("raise({sig}) returned");
    Ok(())
}

/// Must not race a handler running on another thread.
pub fn state() -> State {
    compiler_fence(Ordering::SeqCst);
    // SAFETY: the only writer is the handler, which runs to completion inside `raise`.
    unsafe {
        match MESSAGE.volatile_get() {
            Some(message) => State::Signaled(Delivery {
                message,
                signo: SIGNAL_NUM.volatile_get(),
            }),
            None => State::Unsignaled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The only test that raises: the cells are process-wide and tests share a process.
    #[test]
    fn raise_moves_to_signaled() {
        assert_eq!(state(), State::Unsignaled);

        install(DEMO_SIGNAL, SaFlags::empty()).unwrap();
        assert_eq!(state(), State::Unsignaled);

        raise(DEMO_SIGNAL).unwrap();
        assert_eq!(
            state(),
            State::Signaled(Delivery {
                message: RECEIVED_MESSAGE,
                signo: DEMO_SIGNAL,
            })
        );
    }

    #[test]
    fn install_rejects_uncatchable() {
        assert_eq!(
            install(libc::SIGKILL, SaFlags::empty()),
            Err(Errno(libc::EINVAL))
        );
        assert_eq!(
            install(libc::SIGSTOP, SaFlags::RESTART),
            Err(Errno(libc::EINVAL))
        );
    }

    #[test]
    fn install_rejects_signal_zero() {
        assert_eq!(install(0, SaFlags::empty()), Err(Errno(libc::EINVAL)));
    }

    #[test]
    fn delivery_line() {
        let delivery = Delivery {
            message: RECEIVED_MESSAGE,
            signo: 10,
        };
        assert_eq!(delivery.to_string(), "Signal received: 10");
    }

    #[test]
    fn flags_map_to_sa_bits() {
        assert_eq!(SaFlags::empty().bits(), 0);
        assert_eq!(SaFlags::RESTART.bits(), libc::SA_RESTART);
        let both = SaFlags::RESTART | SaFlags::NODEFER;
        assert_eq!(both.bits(), libc::SA_RESTART | libc::SA_NODEFER);
    }

    #[test]
    fn install_passes_flags_through() {
        // SIGUSR2 is never raised here, so the shared cells stay untouched.
        let flags = SaFlags::NODEFER | SaFlags::RESETHAND;
        install(libc::SIGUSR2, flags).unwrap();

        let mut current: libc::sigaction = unsafe { mem::zeroed() };
        assert_eq!(
            unsafe { libc::sigaction(libc::SIGUSR2, ptr::null(), &mut current) },
            0
        );
        assert_eq!(current.sa_flags & flags.bits(), flags.bits());
        assert_eq!(
            current.sa_sigaction,
            record_delivery as extern "C" fn(c_int) as libc::sighandler_t
        );
    }
}
