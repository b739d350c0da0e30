use std::{error::Error, fmt, io};

use libc::c_int;

/// Positive error codes (EINVAL, not -EINVAL).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Errno(pub c_int);

impl Errno {
    /// The calling thread's `errno`, as left by the libc call that just failed.
    pub fn last() -> Self {
        Errno(io::Error::last_os_error().raw_os_error().unwrap_or(0))
    }
}

impl From<Errno> for io::Error {
    #[inline]
    fn from(Errno(errno): Errno) -> Self {
        Self::from_raw_os_error(errno)
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 <= 0 {
            return write!(f, "unknown error ({})", self.0);
        }
        // io::Error appends " (os error N)" to the description.
        let desc = io::Error::from_raw_os_error(self.0).to_string();
        match desc.rsplit_once(" (os error ") {
            Some((desc, _)) => write!(f, "{desc}"),
            None => write!(f, "{desc}"),
        }
    }
}

impl Error for Errno {}

/// Maps the `-1`-on-failure convention of libc onto `Result`.
pub(crate) fn cvt(ret: c_int) -> Result<c_int, Errno> {
    if ret == -1 {
        Err(Errno::last())
    } else {
        Ok(ret)
    }
}
