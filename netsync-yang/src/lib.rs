//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod serde;

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock as Lazy, OnceLock};

use maplit::hashmap;
use yang4::context::{
    Context, ContextFlags, EmbeddedModuleKey, EmbeddedModules,
};
use yang4::data::DataNodeRef;

// Global YANG context.
pub static YANG_CTX: OnceLock<Arc<Context>> = OnceLock::new();

// List of embedded YANG modules.
//
// All implemented or imported modules need to be specified here. Loading YANG
// modules from the filesystem isn't supported.
pub static YANG_EMBEDDED_MODULES: Lazy<EmbeddedModules> = Lazy::new(|| {
    hashmap! {
        EmbeddedModuleKey::new("iana-if-type", Some("2017-01-19"), None, None) =>
            include_str!("../modules/ietf/iana-if-type@2017-01-19.yang"),
        EmbeddedModuleKey::new("ietf-inet-types", Some("2013-07-15"), None, None) =>
            include_str!("../modules/ietf/ietf-inet-types@2013-07-15.yang"),
        EmbeddedModuleKey::new("ietf-interfaces", Some("2018-02-20"), None, None) =>
            include_str!("../modules/ietf/ietf-interfaces@2018-02-20.yang"),
        EmbeddedModuleKey::new("ietf-ip", Some("2018-02-22"), None, None) =>
            include_str!("../modules/ietf/ietf-ip@2018-02-22.yang"),
        EmbeddedModuleKey::new("ietf-ipv4-unicast-routing", Some("2018-03-13"), None, None) =>
            include_str!("../modules/ietf/ietf-ipv4-unicast-routing@2018-03-13.yang"),
        EmbeddedModuleKey::new("ietf-ipv6-unicast-routing", Some("2018-03-13"), None, None) =>
            include_str!("../modules/ietf/ietf-ipv6-unicast-routing@2018-03-13.yang"),
        EmbeddedModuleKey::new("ietf-routing", Some("2018-03-13"), None, None) =>
            include_str!("../modules/ietf/ietf-routing@2018-03-13.yang"),
        EmbeddedModuleKey::new("ietf-yang-types", Some("2013-07-15"), None, None) =>
            include_str!("../modules/ietf/ietf-yang-types@2013-07-15.yang"),
    }
});

// All modules currently implemented.
//
// The list includes modules that define YANG identities that can be
// instantiated.
pub static YANG_IMPLEMENTED_MODULES: Lazy<Vec<&'static str>> =
    Lazy::new(|| {
        vec![
            "iana-if-type",
            "ietf-interfaces",
            "ietf-ip",
            "ietf-routing",
            "ietf-ipv4-unicast-routing",
            "ietf-ipv6-unicast-routing",
        ]
    });

// All features currently supported.
pub static YANG_FEATURES: Lazy<HashMap<&'static str, Vec<&'static str>>> =
    Lazy::new(|| {
        hashmap! {
            "ietf-ip" => vec![
                "ipv4-non-contiguous-netmasks",
            ],
        }
    });

//
// YANG conversion traits.
//

pub trait ToYang {
    // Return YANG textual representation of the value.
    fn to_yang(&self) -> Cow<'static, str>;
}

pub trait TryFromYang: Sized {
    // Construct value from YANG identity or enum value.
    fn try_from_yang(identity: &str) -> Option<Self>;
}

// A trait representing YANG objects (containers or lists).
pub trait YangObject {
    // Initialize a given YANG data node with attributes from the current
    // object.
    fn into_data_node(self: Box<Self>, dnode: &mut DataNodeRef<'_>);

    // Return the keys of the list, or an empty string for containers or keyless
    // lists.
    fn list_keys(&self) -> String {
        String::new()
    }
}

//
// YANG path type.
//
// Instances of this structure should be preferred over regular strings for
// extra type safety.
//
#[derive(Clone, Copy, Debug)]
pub struct YangPath(&'static str);

// ===== impl YangPath =====

impl YangPath {
    pub const fn new(path: &'static str) -> YangPath {
        YangPath(path)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for YangPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for YangPath {
    fn as_ref(&self) -> &str {
        self.0
    }
}

// ===== global functions =====

// Creates empty YANG context.
pub fn new_context() -> Context {
    let mut ctx = Context::new(
        ContextFlags::NO_YANGLIBRARY | ContextFlags::DISABLE_SEARCHDIRS,
    )
    .expect("Failed to create YANG context");
    ctx.set_embedded_modules(&YANG_EMBEDDED_MODULES);
    ctx
}

// Loads a YANG module.
pub fn load_module(ctx: &mut Context, name: &str) {
    let features = YANG_FEATURES
        .get(name)
        .map(|features| features.as_slice())
        .unwrap_or_else(|| &[]);
    if let Err(error) = ctx.load_module(name, None, features) {
        panic!("failed to load YANG module: {error}");
    }
}

// ===== tests =====

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_implemented_modules() {
        let mut ctx = new_context();
        for module_name in YANG_IMPLEMENTED_MODULES.iter() {
            load_module(&mut ctx, module_name);
        }

        for module_name in YANG_IMPLEMENTED_MODULES.iter() {
            assert!(ctx.get_module_latest(module_name).is_some());
        }

        // The non-contiguous netmask feature of ietf-ip must be enabled.
        assert!(
            ctx.find_path(
                "/ietf-interfaces:interfaces/interface/ietf-ip:ipv4/address/netmask"
            )
            .is_ok()
        );
    }
}
