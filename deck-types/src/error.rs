//! Error types for swipedeck.

use thiserror::Error;

/// Errors that can occur when building or parsing swipedeck types.
#[derive(Debug, Error)]
pub enum SwipeError {
    /// Device identifier was empty
    #[error("device id is empty")]
    EmptyDeviceId,

    /// Device identifier exceeded the maximum length
    #[error("device id too long: {len} bytes (limit: {limit})")]
    DeviceIdTooLong {
        /// Actual length in bytes.
        len: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// Unknown swipe action name
    #[error("unknown swipe action: {0}")]
    UnknownAction(String),

    /// Invalid data format
    #[error("invalid data: {0}")]
    InvalidData(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SwipeError::UnknownAction("superlike".into());
        assert_eq!(err.to_string(), "unknown swipe action: superlike");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SwipeError>();
    }
}
