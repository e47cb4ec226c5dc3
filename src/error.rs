//! Error handling primitives for the ADXL375 driver.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// The underlying bus transmit or receive primitive failed.
    Bus(E),
    /// An operation was attempted before a transport handle was bound.
    NotInitialized,
    /// Binding was attempted with an absent transport handle.
    InvalidHandle,
    /// The identity handshake exhausted its retry budget without a match.
    DeviceNotFound,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Bus(err)
    }
}
