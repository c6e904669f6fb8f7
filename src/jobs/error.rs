//! # Errores del Sistema de Jobs
//! src/jobs/error.rs
//!
//! Errores internos tipados. Nunca cruzan la frontera C: se traducen a
//! `ProcessingStatus` antes de salir.

use crate::jobs::types::ProcessingStatus;
use std::sync::PoisonError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("queue is full (max capacity: {capacity})")]
    QueueFull { capacity: usize },

    #[error("queue is closed")]
    QueueClosed,

    #[error("result channel is closed")]
    ChannelClosed,

    #[error("no result within {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("lock poisoned")]
    LockPoisoned,

    #[error("invalid or freed processor handle")]
    InvalidHandle,

    #[error("null output pointer")]
    NullPointer,

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

impl<T> From<PoisonError<T>> for ProcessorError {
    fn from(_: PoisonError<T>) -> Self {
        ProcessorError::LockPoisoned
    }
}

impl ProcessorError {
    /// Traduce un error de enqueue a la taxonomía de la ABI
    ///
    /// Un lock envenenado o un handle inválido significan que el pipeline ya no
    /// acepta trabajo, así que se reportan como `EnqueFailed`.
    pub fn enqueue_status(&self) -> ProcessingStatus {
        match self {
            ProcessorError::QueueFull { .. } => ProcessingStatus::Overflow,
            ProcessorError::QueueClosed
            | ProcessorError::LockPoisoned
            | ProcessorError::InvalidHandle => ProcessingStatus::EnqueFailed,
            other => ProcessingStatus::from(other),
        }
    }
}

impl From<&ProcessorError> for ProcessingStatus {
    fn from(err: &ProcessorError) -> Self {
        match err {
            ProcessorError::QueueFull { .. } => ProcessingStatus::Overflow,
            ProcessorError::QueueClosed => ProcessingStatus::EnqueFailed,
            ProcessorError::Timeout { .. } => ProcessingStatus::Timeout,
            ProcessorError::ChannelClosed
            | ProcessorError::LockPoisoned
            | ProcessorError::InvalidHandle
            | ProcessorError::NullPointer
            | ProcessorError::Spawn(_) => ProcessingStatus::OtherError,
        }
    }
}

impl From<ProcessorError> for ProcessingStatus {
    fn from(err: ProcessorError) -> Self {
        ProcessingStatus::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ProcessingStatus::from(ProcessorError::QueueFull { capacity: 2 }),
            ProcessingStatus::Overflow
        );
        assert_eq!(
            ProcessingStatus::from(ProcessorError::QueueClosed),
            ProcessingStatus::EnqueFailed
        );
        assert_eq!(
            ProcessingStatus::from(ProcessorError::Timeout { timeout_ms: 5 }),
            ProcessingStatus::Timeout
        );
        assert_eq!(
            ProcessingStatus::from(ProcessorError::ChannelClosed),
            ProcessingStatus::OtherError
        );
    }

    #[test]
    fn test_enqueue_status_for_poisoned_lock() {
        assert_eq!(
            ProcessorError::LockPoisoned.enqueue_status(),
            ProcessingStatus::EnqueFailed
        );
        assert_eq!(
            ProcessingStatus::from(ProcessorError::LockPoisoned),
            ProcessingStatus::OtherError
        );
    }

    #[test]
    fn test_error_messages() {
        let err = ProcessorError::QueueFull { capacity: 8 };
        assert_eq!(err.to_string(), "queue is full (max capacity: 8)");
    }
}
