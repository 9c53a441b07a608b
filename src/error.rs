//! Error types for map operations.
//!
//! Every failure is detected before any structural work starts, so a
//! returned error never comes with a partially built map.

use thiserror::Error;

/// Errors raised by `PersistentHashMap` and the
/// [`traversal`](crate::traversal) algebra.
///
/// # Examples
///
/// ```rust
/// use persistent_map::MapError;
///
/// let error = MapError::InvalidPartitionParameter {
///     operation: "grouped",
///     parameter: "size",
///     value: 0,
/// };
/// assert_eq!(format!("{error}"), "grouped: size must be positive, got 0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// The key was not present in the map.
    ///
    /// Only the partial-function form (`apply`) reports this; `get`
    /// returns `None` instead.
    #[error("key not found")]
    KeyNotFound,

    /// The operation needs at least one entry.
    ///
    /// Raised by `init` and `tail`; `init_option` and `tail_option` return
    /// `None` instead.
    #[error("{operation} of an empty map")]
    EmptyMap {
        /// The operation that found no entries.
        operation: &'static str,
    },

    /// A window size or step was zero.
    #[error("{operation}: {parameter} must be positive, got {value}")]
    InvalidPartitionParameter {
        /// The operation that rejected the parameter.
        operation: &'static str,
        /// The name of the rejected parameter.
        parameter: &'static str,
        /// The rejected value.
        value: usize,
    },
}

impl MapError {
    /// Returns `Ok(value)` when `value` is positive.
    pub(crate) fn require_positive(
        operation: &'static str,
        parameter: &'static str,
        value: usize,
    ) -> Result<usize, Self> {
        if value == 0 {
            tracing::debug!(operation, parameter, value, "rejected partition parameter");
            Err(Self::InvalidPartitionParameter {
                operation,
                parameter,
                value,
            })
        } else {
            Ok(value)
        }
    }
}
