use alloy::{
    rpc::json_rpc::ErrorPayload,
    transports::{RpcError, TransportError},
};

pub trait TransportErrorExt {
    /// Returns whether the request failed before the node produced any
    /// JSON-RPC response, e.g. because it could not be reached at all.
    fn is_transport_failure(&self) -> bool;

    /// Returns the error object the node responded with, if any.
    fn node_error(&self) -> Option<&ErrorPayload>;
}

impl TransportErrorExt for TransportError {
    fn is_transport_failure(&self) -> bool {
        matches!(self, RpcError::Transport(_))
    }

    fn node_error(&self) -> Option<&ErrorPayload> {
        match self {
            RpcError::ErrorResp(payload) => Some(payload),
            _ => None,
        }
    }
}

/// Create an error as if the node could not be reached. Useful for testing.
#[cfg(any(test, feature = "test-util"))]
pub fn testing_transport_failure() -> TransportError {
    alloy::transports::TransportErrorKind::custom_str("connection refused")
}

/// Create an error as if the node answered with a JSON-RPC error. Useful for
/// testing.
#[cfg(any(test, feature = "test-util"))]
pub fn testing_node_error(code: i64, message: &'static str) -> TransportError {
    TransportError::ErrorResp(ErrorPayload {
        code,
        message: message.into(),
        data: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failure() {
        let err = testing_transport_failure();
        assert!(err.is_transport_failure());
        assert!(err.node_error().is_none());
    }

    #[test]
    fn node_error() {
        let err = testing_node_error(-32000, "intrinsic gas too low");
        assert!(!err.is_transport_failure());
        assert_eq!(err.node_error().unwrap().message, "intrinsic gas too low");
        assert_eq!(err.node_error().unwrap().code, -32000);
    }
}
