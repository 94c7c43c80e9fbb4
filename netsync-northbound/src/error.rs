//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use tracing::warn;

// Northbound errors.
#[derive(Debug)]
pub enum Error {
    ValidationCallback(String),
    CfgCallback(String),
    CfgApply(String),
    YangInvalidPath(yang4::Error),
}

// ===== impl Error =====

impl Error {
    pub fn log(&self) {
        match self {
            Error::ValidationCallback(error) => {
                warn!(%error, "{}", self);
            }
            Error::CfgCallback(error) => {
                warn!(%error, "{}", self);
            }
            Error::CfgApply(error) => {
                warn!(%error, "{}", self);
            }
            Error::YangInvalidPath(error) => {
                warn!(%error, "{}", self);
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ValidationCallback(..) => {
                write!(f, "validation callback failed")
            }
            Error::CfgCallback(..) => {
                write!(f, "configuration callback failed")
            }
            Error::CfgApply(..) => {
                write!(f, "configuration apply failed")
            }
            Error::YangInvalidPath(..) => {
                write!(f, "Invalid YANG data path")
            }
        }
    }
}

impl std::error::Error for Error {}
