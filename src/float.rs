//! Representation error of `0.1 + 0.2` at single and double precision.
//!
//! The addends go through volatile storage before the addition so the sum is
//! produced by the FPU at run time instead of by constant folding.

use core::{fmt, ops::Add, ptr};
use std::io::{self, Write};

/// A binary floating-point width the demonstration is run at.
pub trait Precision: Copy + Add<Output = Self> + fmt::Display + PartialEq {
    /// Name of the matching C type.
    const C_NAME: &'static str;
    const ONE_TENTH: Self;
    const TWO_TENTHS: Self;

    /// Raw IEEE-754 encoding, widened to 64 bits.
    fn bits(self) -> u64;
}

impl Precision for f32 {
    const C_NAME: &'static str = "float";
    const ONE_TENTH: Self = 0.1;
    const TWO_TENTHS: Self = 0.2;

    fn bits(self) -> u64 {
        u64::from(self.to_bits())
    }
}

impl Precision for f64 {
    const C_NAME: &'static str = "double";
    const ONE_TENTH: Self = 0.1;
    const TWO_TENTHS: Self = 0.2;

    fn bits(self) -> u64 {
        self.to_bits()
    }
}

/// Two addends and the sum the hardware produced for them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sum<T> {
    pub lhs: T,
    pub rhs: T,
    pub sum: T,
}

impl<T: Precision> Sum<T> {
    pub fn compute(lhs: T, rhs: T) -> Self {
        let mut lhs_slot = lhs;
        let mut rhs_slot = rhs;
        // SAFETY: both pointers come from live, aligned locals.
        let (lhs, rhs) = unsafe {
            ptr::write_volatile(&mut lhs_slot, lhs);
            ptr::write_volatile(&mut rhs_slot, rhs);
            (ptr::read_volatile(&lhs_slot), ptr::read_volatile(&rhs_slot))
        };
        let sum = lhs + rhs;
        log::trace!(
            "{}: {:#x} + {:#x} = {:#x}",
            T::C_NAME,
            lhs.bits(),
            rhs.bits(),
            sum.bits()
        );
        Self { lhs, rhs, sum }
    }

    pub fn tenths() -> Self {
        Self::compute(T::ONE_TENTH, T::TWO_TENTHS)
    }
}

impl<T: fmt::Display> fmt::Display for Sum<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {} = {}", self.lhs, self.rhs, self.sum)
    }
}

/// Writes the single precision line, then the double precision one.
pub fn report<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    let single = Sum::<f32>::tenths();
    let double = Sum::<f64>::tenths();
    log::debug!("{}: {single}", f32::C_NAME);
    log::debug!("{}: {double}", f64::C_NAME);

    writeln!(out, "{single}")?;
    writeln!(out, "{double}")?;
    out.flush()
}
