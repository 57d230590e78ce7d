use {
    crate::node::NodeError,
    alloy::primitives::B256,
    std::{path::PathBuf, time::Duration},
};

/// Everything that can abort a deployment run. Each variant maps to its own
/// process exit code so scripts can tell failures apart.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not reach the node: {0}")]
    Connection(String),

    #[error("compilation failed:\n{0}")]
    Compilation(String),

    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error("deployment failed: {0}")]
    Deployment(String),

    #[error("transaction {tx_hash} was not mined within {}", format_duration(.waited))]
    DeploymentTimeout { tx_hash: B256, waited: Duration },

    /// `tx_hash` is `None` if the run stopped before the node accepted the
    /// transaction.
    #[error("{}", describe_cancellation(.tx_hash))]
    Cancelled { tx_hash: Option<B256> },

    #[error("call to {method} failed: {message}")]
    Call { method: String, message: String },

    #[error("{method}() returned {actual:?}, expected {expected:?}")]
    Assertion {
        method: String,
        expected: String,
        actual: String,
    },

    #[error(transparent)]
    Node(NodeError),

    #[error("failed to read {path:?}: {source}")]
    Source {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("deployment artifact: {0}")]
    Artifact(String),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Connection(_) => 2,
            Self::Compilation(_) => 3,
            Self::Argument(_) => 4,
            Self::Deployment(_) => 5,
            Self::DeploymentTimeout { .. } => 6,
            Self::Assertion { .. } => 7,
            Self::Call { .. } => 8,
            Self::Node(_) => 9,
            Self::Source { .. } => 10,
            Self::Artifact(_) => 11,
            // Same as a process killed by SIGINT.
            Self::Cancelled { .. } => 130,
        }
    }
}

impl From<NodeError> for Error {
    fn from(err: NodeError) -> Self {
        match err {
            NodeError::Unreachable(message) => Self::Connection(message),
            err => Self::Node(err),
        }
    }
}

fn format_duration(duration: &Duration) -> humantime::FormattedDuration {
    humantime::format_duration(*duration)
}

fn describe_cancellation(tx_hash: &Option<B256>) -> String {
    match tx_hash {
        Some(hash) => format!("stopped waiting for transaction {hash}"),
        None => "stopped before submitting the transaction".to_string(),
    }
}

/// Arguments that do not fit the contract's ABI. Detected locally while
/// encoding, before anything is sent to the node.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("{target} expects {expected} arguments but {actual} were given")]
    Count {
        target: String,
        expected: usize,
        actual: usize,
    },

    #[error("argument {index} ({name}) of {target}: {value:?} is not a valid {ty}: {reason}")]
    Type {
        target: String,
        index: usize,
        name: String,
        ty: String,
        value: String,
        reason: String,
    },

    #[error("contract has no method {0:?}")]
    UnknownMethod(String),

    #[error("could not encode arguments for {target}: {reason}")]
    Encoding { target: String, reason: String },
}
