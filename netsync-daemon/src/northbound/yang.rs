//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::sync::Arc;

use netsync_northbound::ProviderBase;
use netsync_yang as yang;
use netsync_yang::YANG_CTX;

fn modules_add<P: ProviderBase>(modules: &mut Vec<&'static str>) {
    modules.extend(P::yang_modules().iter());
}

pub(crate) fn create_context() {
    let mut modules = Vec::new();

    // Add data type modules.
    modules.push("iana-if-type");

    // Add core modules.
    modules_add::<netsync_interface::Master>(&mut modules);
    modules_add::<netsync_routing::Master>(&mut modules);

    // Create YANG context and load all required modules.
    let mut yang_ctx = yang::new_context();
    for module_name in modules.iter() {
        yang::load_module(&mut yang_ctx, module_name);
    }
    YANG_CTX.set(Arc::new(yang_ctx)).unwrap();
}
