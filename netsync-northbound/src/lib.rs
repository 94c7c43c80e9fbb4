//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

#![allow(type_alias_bounds)]

mod debug;

pub mod api;
pub mod configuration;
pub mod error;
pub mod state;
pub mod yang;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{Receiver, Sender};
use tracing::Span;
use yang4::schema::{SchemaNode, SchemaNodeKind};

use crate::debug::Debug;

//
// Useful type definitions.
//
pub type NbDaemonSender = Sender<api::daemon::Request>;
pub type NbDaemonReceiver = Receiver<api::daemon::Request>;

// Northbound callback operations.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub enum CallbackOp {
    Create,
    Modify,
    Delete,
    Lookup,
    GetIterate,
    GetObject,
}

// Unique identifier of a northbound callback.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub struct CallbackKey {
    pub path: String,
    pub operation: CallbackOp,
}

/// Base northbound provider trait.
pub trait ProviderBase
where
    Self: 'static + Sized,
{
    fn yang_modules() -> &'static [&'static str];

    fn top_level_node(&self) -> String;

    fn debug_span(name: &str) -> Span;
}

// ===== impl CallbackOp =====

impl CallbackOp {
    pub fn is_valid(&self, snode: &SchemaNode<'_>) -> bool {
        match self {
            CallbackOp::Create => CallbackOp::create_is_valid(snode),
            CallbackOp::Modify => CallbackOp::modify_is_valid(snode),
            CallbackOp::Delete => CallbackOp::delete_is_valid(snode),
            CallbackOp::Lookup => CallbackOp::lookup_is_valid(snode),
            CallbackOp::GetIterate => CallbackOp::get_iterate_is_valid(snode),
            CallbackOp::GetObject => CallbackOp::get_object_is_valid(snode),
        }
    }

    fn create_is_valid(snode: &SchemaNode<'_>) -> bool {
        if !snode.is_config() {
            return false;
        }

        match snode.kind() {
            SchemaNodeKind::Container => !snode.is_np_container(),
            SchemaNodeKind::LeafList | SchemaNodeKind::List => true,
            _ => false,
        }
    }

    fn modify_is_valid(snode: &SchemaNode<'_>) -> bool {
        if !snode.is_config() {
            return false;
        }

        match snode.kind() {
            SchemaNodeKind::Leaf => !snode.is_list_key(),
            _ => false,
        }
    }

    fn delete_is_valid(snode: &SchemaNode<'_>) -> bool {
        if !snode.is_config() {
            return false;
        }

        match snode.kind() {
            SchemaNodeKind::Container => !snode.is_np_container(),
            SchemaNodeKind::Leaf => {
                // Only optional leaves without a default value can be
                // deleted from the configuration.
                !snode.is_list_key()
                    && !snode.is_mandatory()
                    && matches!(snode.default_value_canonical(), Ok(None))
            }
            SchemaNodeKind::LeafList | SchemaNodeKind::List => true,
            _ => false,
        }
    }

    fn lookup_is_valid(snode: &SchemaNode<'_>) -> bool {
        if !snode.is_config() {
            return false;
        }

        matches!(snode.kind(), SchemaNodeKind::List)
    }

    fn get_iterate_is_valid(snode: &SchemaNode<'_>) -> bool {
        matches!(snode.kind(), SchemaNodeKind::List)
    }

    fn get_object_is_valid(snode: &SchemaNode<'_>) -> bool {
        fn contains_leafs(snode: &SchemaNode<'_>) -> bool {
            snode.children().any(|snode| match snode.kind() {
                SchemaNodeKind::Leaf | SchemaNodeKind::LeafList => true,
                SchemaNodeKind::Choice | SchemaNodeKind::Case => {
                    contains_leafs(&snode)
                }
                _ => false,
            })
        }

        match snode.kind() {
            SchemaNodeKind::Container | SchemaNodeKind::List => {
                contains_leafs(snode)
            }
            _ => false,
        }
    }
}

// ===== impl CallbackKey =====

impl CallbackKey {
    pub fn new(path: String, operation: CallbackOp) -> Self {
        CallbackKey { path, operation }
    }
}

// ===== helper functions =====

fn process_get_callbacks<P>() -> api::daemon::GetCallbacksResponse
where
    P: configuration::Provider + state::Provider,
{
    let mut callbacks = HashSet::new();
    if let Some(cbs) = <P as configuration::Provider>::callbacks() {
        callbacks.extend(cbs.keys());
    }
    callbacks.extend(<P as state::Provider>::callbacks().keys());

    api::daemon::GetCallbacksResponse { callbacks }
}

// ===== global functions =====

// Processes a northbound message coming from the daemon.
pub async fn process_northbound_msg<P>(
    provider: &mut P,
    resources: &mut Vec<Option<P::Resource>>,
    request: api::daemon::Request,
) where
    P: configuration::Provider + state::Provider + Send,
{
    Debug::RequestRx(&request).log();

    match request {
        api::daemon::Request::GetCallbacks(request) => {
            let response = process_get_callbacks::<P>();
            if let Some(responder) = request.responder {
                responder.send(response).unwrap();
            }
        }
        api::daemon::Request::Validate(request) => {
            let response =
                configuration::process_validate(provider, request.config);
            if let Some(responder) = request.responder {
                responder.send(response).unwrap();
            }
        }
        api::daemon::Request::Commit(request) => {
            let response = configuration::process_commit(
                provider,
                request.phase,
                request.old_config,
                request.new_config,
                request.changes,
                resources,
            )
            .await;
            if let Some(responder) = request.responder {
                responder.send(response).unwrap();
            }
        }
        api::daemon::Request::Get(request) => {
            let response = state::process_get(provider, request.path);
            if let Some(responder) = request.responder {
                responder.send(response).unwrap();
            }
        }
    }
}
