use core::{cell::UnsafeCell, ptr};

/// Wrapper over `UnsafeCell` that can directly be used in statics, where all modifications require
/// unsafe.
#[repr(transparent)]
pub struct RawCell<T> {
    inner: UnsafeCell<T>,
}
impl<T> RawCell<T> {
    #[inline]
    pub const fn new(t: T) -> Self {
        Self {
            inner: UnsafeCell::new(t),
        }
    }
}
impl<T: Copy> RawCell<T> {
    /// Load that the compiler may neither elide nor move across other volatile accesses.
    ///
    /// # Safety
    ///
    /// No other thread may be writing the cell. A signal handler on the current thread may.
    #[inline]
    pub unsafe fn volatile_get(&self) -> T {
        ptr::read_volatile(self.inner.get())
    }
    /// # Safety
    ///
    /// Same as [`RawCell::volatile_get`].
    #[inline]
    pub unsafe fn volatile_set(&self, t: T) {
        ptr::write_volatile(self.inner.get(), t);
    }
}

// SAFETY: Sync requires that no safe interface be allowed to act on &self in a way that is
// undefined behavior when accessed concurrently. Every accessor that touches the value is unsafe,
// and nothing hands out references.
unsafe impl<T> Sync for RawCell<T> {}
