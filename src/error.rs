use thiserror::Error;

/// The result of an interruptible operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Error returned when an operation stopped before producing a result.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum Error {
    /// The operation observed a raised [`Interrupt`][crate::interrupt::Interrupt].
    #[error("operation interrupted")]
    Interrupted,
}
