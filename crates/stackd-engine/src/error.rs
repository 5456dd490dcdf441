//! Adapter error types

use thiserror::Error;

/// Engine adapter error
#[derive(Error, Debug)]
pub enum EngineError {
    /// The CLI exited nonzero
    #[error("engine CLI exited with code {code}: {stderr}")]
    ExitStatus {
        /// Process exit code (-1 when killed by signal)
        code: i32,
        /// Captured stderr
        stderr: String,
    },

    /// CLI output that was expected to be structured failed to decode.
    /// Distinct from a nonzero exit: the process succeeded but lied about
    /// its output format.
    #[error("failed to decode engine CLI output: {0}")]
    Decode(#[from] serde_json::Error),

    /// Spawning or talking to the process failed
    #[error("engine io error: {0}")]
    Io(#[from] std::io::Error),

    /// The structured HTTP transport failed
    #[error("engine transport error: {0}")]
    Transport(String),
}

impl From<EngineError> for stackd_common::Error {
    fn from(err: EngineError) -> Self {
        stackd_common::Error::Engine(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_and_exit_are_distinct() {
        let exit = EngineError::ExitStatus { code: 1, stderr: "boom".into() };
        let decode = EngineError::Decode(serde_json::from_str::<i32>("nope").unwrap_err());

        assert!(matches!(exit, EngineError::ExitStatus { .. }));
        assert!(matches!(decode, EngineError::Decode(_)));
    }
}
