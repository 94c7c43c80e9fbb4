//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use tracing::warn;

// Routing errors.
#[derive(Debug)]
pub enum Error {
    NetlinkRequest(rtnetlink::Error),
}

// ===== impl Error =====

impl Error {
    pub(crate) fn log(&self) {
        match self {
            Error::NetlinkRequest(error) => {
                warn!(error = %with_source(error), "{}", self);
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NetlinkRequest(..) => {
                write!(f, "netlink request failed")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::NetlinkRequest(error) => Some(error),
        }
    }
}

impl From<rtnetlink::Error> for Error {
    fn from(error: rtnetlink::Error) -> Error {
        Error::NetlinkRequest(error)
    }
}

impl From<Error> for netsync_northbound::error::Error {
    fn from(error: Error) -> netsync_northbound::error::Error {
        netsync_northbound::error::Error::CfgApply(with_source(error))
    }
}

// ===== global functions =====

fn with_source<E: std::error::Error>(error: E) -> String {
    if let Some(source) = error.source() {
        format!("{} ({})", error, with_source(source))
    } else {
        error.to_string()
    }
}
