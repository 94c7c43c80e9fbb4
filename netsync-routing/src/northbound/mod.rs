//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod configuration;
pub mod state;

use netsync_northbound::ProviderBase;
use tracing::{Span, debug_span};

use crate::Master;

// ===== impl Master =====

impl ProviderBase for Master {
    fn yang_modules() -> &'static [&'static str] {
        &[
            "ietf-routing",
            "ietf-ipv4-unicast-routing",
            "ietf-ipv6-unicast-routing",
        ]
    }

    fn top_level_node(&self) -> String {
        "/ietf-routing:routing".to_owned()
    }

    fn debug_span(_name: &str) -> Span {
        debug_span!("routing")
    }
}
