//! Error types.
//!
//! Malformed input and degenerate instances fail fast with a [`TspError`].
//! Normal termination conditions (reaching the minimum temperature, a closed
//! nearest-neighbour tour that cannot be closed) are reported through the
//! state history instead.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type TspResult<T> = Result<T, TspError>;

/// Errors raised while loading instances or configuring a run.
#[derive(Debug, Error)]
pub enum TspError {
    /// A text record could not be parsed.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number of the offending record.
        line: usize,
        /// What was wrong with the record.
        message: String,
    },

    /// An edge record references a node index that was never declared.
    #[error("line {line}: edge references unknown node {index}")]
    UnknownNode {
        /// 1-based line number of the edge record.
        line: usize,
        /// The missing node index.
        index: usize,
    },

    /// Two nodes share the same index.
    #[error("line {line}: node {index} is declared twice")]
    DuplicateNode {
        /// 1-based line number of the second declaration, 0 when the nodes
        /// were not read from text.
        line: usize,
        /// The repeated node index.
        index: usize,
    },

    /// An edge record connects a node to itself.
    #[error("line {line}: edge connects node {index} to itself")]
    SelfLoop {
        /// 1-based line number of the edge record.
        line: usize,
        /// The node index.
        index: usize,
    },

    /// Two distinct nodes sit on the same position.
    #[error("nodes {first} and {second} share the same position")]
    DuplicatePosition {
        /// Index of the first node.
        first: usize,
        /// Index of the second node.
        second: usize,
    },

    /// The metric yields a zero distance between two distinct nodes.
    #[error("distance between nodes {first} and {second} is zero")]
    ZeroDistance {
        /// Index of the first node.
        first: usize,
        /// Index of the second node.
        second: usize,
    },

    /// The instance is too small for the requested operation.
    #[error("{operation} needs at least {required} nodes, instance has {actual}")]
    TooFewNodes {
        /// The operation that was requested.
        operation: &'static str,
        /// Minimum node count.
        required: usize,
        /// Node count of the instance.
        actual: usize,
    },

    /// A configured node index does not exist in the instance.
    #[error("node {0} is not part of the instance")]
    MissingNode(usize),

    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Reading an instance file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_names_line() {
        let err = TspError::Parse {
            line: 7,
            message: "expected 4 fields".into(),
        };
        assert_eq!(err.to_string(), "line 7: expected 4 fields");
    }

    #[test]
    fn test_too_few_nodes_message() {
        let err = TspError::TooFewNodes {
            operation: "2-opt",
            required: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "2-opt needs at least 3 nodes, instance has 2"
        );
    }

    #[test]
    fn test_io_error_converts() {
        fn open() -> TspResult<String> {
            Ok(std::fs::read_to_string("/definitely/not/here.txt")?)
        }
        assert!(matches!(open(), Err(TspError::Io(_))));
    }
}
