//! Results of store operations and poll ticks.

use crate::error::PlaybackError;
use bridge_traits::transport::TransportOperation;

/// What happened to the transport call behind a store operation.
///
/// Local state has already been updated optimistically by the time a
/// `Dispatch` is returned, whatever the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// The transport accepted the call.
    Applied,
    /// No transport call was needed (no-op, or a purely local change).
    NotIssued,
    /// The transport rejected the call. Local state is kept; the next poll
    /// tick or user action supersedes it.
    TransientFailure {
        operation: TransportOperation,
        message: String,
    },
}

impl Dispatch {
    pub fn is_applied(&self) -> bool {
        matches!(self, Dispatch::Applied)
    }

    pub fn is_issued(&self) -> bool {
        !matches!(self, Dispatch::NotIssued)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Dispatch::TransientFailure { .. })
    }
}

impl From<PlaybackError> for Dispatch {
    fn from(err: PlaybackError) -> Self {
        match err.operation() {
            Some(operation) => Dispatch::TransientFailure {
                operation,
                message: err.to_string(),
            },
            None => Dispatch::NotIssued,
        }
    }
}

/// Result of one reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Nothing to reconcile: paused, dragging, or no known duration.
    Skipped,
    /// Position was taken from the transport.
    Reconciled {
        position: f64,
        buffering_cleared: bool,
    },
    /// The track reached its end and the queue moved on.
    Advanced(Dispatch),
    /// A transport query failed; prior values are left in place.
    TransportFailed { operation: TransportOperation },
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::BridgeError;

    #[test]
    fn test_dispatch_predicates() {
        assert!(Dispatch::Applied.is_applied());
        assert!(!Dispatch::NotIssued.is_issued());
        let failure = Dispatch::TransientFailure {
            operation: TransportOperation::Play,
            message: "rejected".into(),
        };
        assert!(failure.is_failure());
        assert!(failure.is_issued());
        assert!(!failure.is_applied());
    }

    #[test]
    fn test_dispatch_from_transport_error() {
        let err = PlaybackError::transport(
            TransportOperation::SetVolume,
            BridgeError::OperationFailed("device lost".into()),
        );
        match Dispatch::from(err) {
            Dispatch::TransientFailure { operation, message } => {
                assert_eq!(operation, TransportOperation::SetVolume);
                assert!(message.contains("device lost"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            Dispatch::from(PlaybackError::IndexOutOfRange { index: 4, len: 4 }),
            Dispatch::NotIssued
        );
    }
}
