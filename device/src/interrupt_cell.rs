use core::{cell::UnsafeCell, mem::MaybeUninit};

/// Wrapper type for [`UnsafeCell`] that implements [`Sync`] and provides convenience methods for
/// dealing with the underlying type.
///
/// The purpose of this cell is to hold interrupt contexts: statics that get initialized before
/// interrupts are enabled and are afterwards used exclusively from interrupts. Interrupts do not
/// nest, so two handlers sharing a context never run at the same time.
pub struct InterruptCell<T>(UnsafeCell<MaybeUninit<T>>);

/// This implementation does not rely on `T: Sync` as well because the peripherals and pins held in
/// the contexts are only ever touched from one interrupt at a time.
unsafe impl<T> Sync for InterruptCell<T> {}

impl<T> InterruptCell<T> {
    pub const fn uninit() -> Self {
        Self(UnsafeCell::new(MaybeUninit::uninit()))
    }

    /// Must be called exactly once, before interrupts get enabled.
    #[allow(clippy::mut_from_ref)]
    pub fn init(&self, inner: T) -> &mut T {
        unsafe { (*self.0.get()).write(inner) }
    }

    /// Must only be called from interrupts, after [`InterruptCell::init`].
    #[allow(clippy::mut_from_ref)]
    pub fn as_inner_mut(&self) -> &mut T {
        unsafe { (*self.0.get()).assume_init_mut() }
    }
}
