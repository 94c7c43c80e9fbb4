//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::str::FromStr;

use netsync_yang::{ToYang, TryFromYang};
use serde::{Deserialize, Serialize};

// The routing protocols present in the RIB.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Direct,
    Static,
}

// ===== impl Protocol =====

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Direct => write!(f, "direct"),
            Protocol::Static => write!(f, "static"),
        }
    }
}

impl FromStr for Protocol {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_ref() {
            "direct" => Ok(Protocol::Direct),
            "static" => Ok(Protocol::Static),
            _ => Err(()),
        }
    }
}

impl ToYang for Protocol {
    fn to_yang(&self) -> std::borrow::Cow<'static, str> {
        match self {
            Protocol::Direct => "ietf-routing:direct".into(),
            Protocol::Static => "ietf-routing:static".into(),
        }
    }
}

impl TryFromYang for Protocol {
    fn try_from_yang(identity: &str) -> Option<Protocol> {
        match identity {
            "ietf-routing:direct" => Some(Protocol::Direct),
            "ietf-routing:static" => Some(Protocol::Static),
            _ => None,
        }
    }
}
