// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::fmt;
use std::process::ExitCode;

pub type InfiniResult = Result<(), InfiniError>;

/// Any error surfaced by a command, with the exit code to report it with.
#[derive(Debug)]
pub struct InfiniError {
    error: eyre::Error,
    exit_code: ExitCode,
}

impl InfiniError {
    pub fn exit_code(&self) -> ExitCode {
        self.exit_code
    }
}

impl fmt::Display for InfiniError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Include the cause chain, e.g. the provider error under a failed declaration.
        write!(f, "{:#}", self.error)
    }
}

impl From<eyre::Error> for InfiniError {
    fn from(error: eyre::Error) -> Self {
        Self {
            error,
            exit_code: ExitCode::FAILURE,
        }
    }
}

impl From<std::io::Error> for InfiniError {
    fn from(err: std::io::Error) -> Self {
        eyre::Error::from(err).into()
    }
}

impl From<infini_tools::Error> for InfiniError {
    fn from(err: infini_tools::Error) -> Self {
        eyre::Error::from(err).into()
    }
}

impl From<infini_tools::core::network::NetworkError> for InfiniError {
    fn from(err: infini_tools::core::network::NetworkError) -> Self {
        eyre::Error::from(err).into()
    }
}

impl From<infini_indexer::IndexError> for InfiniError {
    fn from(err: infini_indexer::IndexError) -> Self {
        eyre::Error::from(err).into()
    }
}
