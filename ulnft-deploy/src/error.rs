// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::fmt;
use std::process::ExitCode;

use ulnft_tools::core::deployment::DeploymentFailure;

use crate::constants::RESUMABLE_EXIT_CODE;

pub type UlnftDeployResult = Result<(), UlnftDeployError>;

#[derive(Debug)]
pub struct UlnftDeployError {
    error: eyre::Error,
    exit_code: ExitCode,
}

impl UlnftDeployError {
    pub fn exit_code(&self) -> ExitCode {
        self.exit_code
    }
}

impl fmt::Display for UlnftDeployError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl From<std::io::Error> for UlnftDeployError {
    fn from(err: std::io::Error) -> Self {
        Self {
            error: err.into(),
            exit_code: ExitCode::FAILURE,
        }
    }
}

impl From<eyre::Error> for UlnftDeployError {
    fn from(error: eyre::Error) -> Self {
        Self {
            error,
            exit_code: ExitCode::FAILURE,
        }
    }
}

impl From<ulnft_tools::Error> for UlnftDeployError {
    fn from(err: ulnft_tools::Error) -> Self {
        Self {
            error: err.into(),
            exit_code: ExitCode::FAILURE,
        }
    }
}

impl From<ulnft_tools::core::manifest::ManifestError> for UlnftDeployError {
    fn from(err: ulnft_tools::core::manifest::ManifestError) -> Self {
        Self {
            error: err.into(),
            exit_code: ExitCode::FAILURE,
        }
    }
}

impl From<DeploymentFailure> for UlnftDeployError {
    fn from(failure: DeploymentFailure) -> Self {
        let exit_code = if failure.error.is_resumable() {
            ExitCode::from(RESUMABLE_EXIT_CODE)
        } else {
            ExitCode::FAILURE
        };
        Self {
            error: failure.error.into(),
            exit_code,
        }
    }
}
