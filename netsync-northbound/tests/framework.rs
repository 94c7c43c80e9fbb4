//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Tests for the northbound callback framework, driven through the daemon
//! request API with a minimal in-memory provider.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock as Lazy};

use async_trait::async_trait;
use netsync_northbound::configuration::{
    Callbacks as CfgCallbacks, CallbacksBuilder as CfgCallbacksBuilder,
    CommitPhase, ConfigChanges, ValidationCallbacks,
    ValidationCallbacksBuilder, changes_from_diff,
};
use netsync_northbound::error::Error;
use netsync_northbound::state::{
    Callbacks as StateCallbacks, CallbacksBuilder as StateCallbacksBuilder,
    ListEntryKind, Provider as StateProvider,
};
use netsync_northbound::yang::interfaces;
use netsync_northbound::{
    CallbackOp, ProviderBase, api, process_northbound_msg,
};
use netsync_utils::yang::DataNodeRefExt;
use netsync_yang::YANG_CTX;
use tokio::sync::oneshot;
use tracing::{Span, debug_span};
use yang4::data::{
    Data, DataDiffFlags, DataFormat, DataParserFlags, DataPrinterFlags,
    DataTree, DataValidationFlags,
};

// ===== test provider =====

#[derive(Debug, Default)]
struct TestInterface {
    enabled: bool,
    description: Option<String>,
}

#[derive(Debug, Default)]
struct TestMaster {
    interfaces: BTreeMap<String, TestInterface>,
    // Events drained by process_event, in processing order.
    processed: Vec<Event>,
}

#[derive(Debug, Default)]
enum ListEntry {
    #[default]
    None,
    Interface(String),
}

impl ListEntry {
    fn into_interface(self) -> Option<String> {
        match self {
            ListEntry::Interface(name) => Some(name),
            ListEntry::None => None,
        }
    }
}

#[derive(Debug)]
enum Resource {}

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
enum Event {
    InterfaceCreate(String),
    InterfaceDelete(String),
    AdminStatusChange(String),
}

#[derive(Debug, Default)]
enum StateListEntry<'a> {
    #[default]
    None,
    Interface(&'a str, &'a TestInterface),
}

impl ListEntryKind for StateListEntry<'_> {}

static VALIDATION_CALLBACKS: Lazy<ValidationCallbacks> =
    Lazy::new(load_validation_callbacks);
static CALLBACKS: Lazy<CfgCallbacks<TestMaster>> = Lazy::new(load_callbacks);
static STATE_CALLBACKS: Lazy<StateCallbacks<TestMaster>> =
    Lazy::new(load_state_callbacks);

fn load_callbacks() -> CfgCallbacks<TestMaster> {
    CfgCallbacksBuilder::<TestMaster>::default()
        .path(interfaces::interface::PATH)
        .create_apply(|master, args| {
            let name = args.dnode.get_string_relative("./name").unwrap();
            master.interfaces.insert(name.clone(), Default::default());
            args.event_queue.insert(Event::InterfaceCreate(name));
        })
        .delete_apply(|master, args| {
            let name = args.list_entry.into_interface().unwrap();
            master.interfaces.remove(&name);
            args.event_queue.insert(Event::InterfaceDelete(name));
        })
        .lookup(|_master, _list_entry, dnode| {
            let name = dnode.get_string_relative("./name").unwrap();
            ListEntry::Interface(name)
        })
        .path(interfaces::interface::description::PATH)
        .modify_apply(|master, args| {
            let name = args.list_entry.into_interface().unwrap();
            let description = args.dnode.get_string();
            let iface = master.interfaces.get_mut(&name).unwrap();
            iface.description = Some(description);
        })
        .delete_apply(|master, args| {
            let name = args.list_entry.into_interface().unwrap();
            let iface = master.interfaces.get_mut(&name).unwrap();
            iface.description = None;
        })
        .path(interfaces::interface::r#type::PATH)
        .modify_prepare(|_master, args| {
            let iface_type = args.dnode.get_string();
            if iface_type == "iana-if-type:tunnel" {
                return Err(format!(
                    "unsupported interface type: {iface_type}"
                ));
            }
            Ok(())
        })
        .modify_apply(|_master, _args| ())
        .path(interfaces::interface::enabled::PATH)
        .modify_apply(|master, args| {
            let name = args.list_entry.into_interface().unwrap();
            let enabled = args.dnode.get_bool();
            let iface = master.interfaces.get_mut(&name).unwrap();
            iface.enabled = enabled;
            args.event_queue.insert(Event::AdminStatusChange(name));
        })
        .build()
}

fn load_validation_callbacks() -> ValidationCallbacks {
    ValidationCallbacksBuilder::default()
        .path(interfaces::interface::r#type::PATH)
        .validate(|args| {
            let iface_type = args.dnode.get_string();
            if iface_type == "iana-if-type:tunnel" {
                return Err(format!(
                    "unsupported interface type: {iface_type}"
                ));
            }
            Ok(())
        })
        .build()
}

fn load_state_callbacks() -> StateCallbacks<TestMaster> {
    StateCallbacksBuilder::<TestMaster>::default()
        .path(interfaces::interface::PATH)
        .get_iterate(|master, _args| {
            let iter = master.interfaces.iter().map(|(name, iface)| {
                StateListEntry::Interface(name.as_str(), iface)
            });
            Some(Box::new(iter))
        })
        .get_object(|_master, args| {
            let (name, iface) = match args.list_entry {
                StateListEntry::Interface(name, iface) => (*name, *iface),
                StateListEntry::None => unreachable!(),
            };
            Box::new(interfaces::interface::Interface {
                name: Cow::Borrowed(name),
                description: Some(
                    iface.description.clone().unwrap_or_default().into(),
                ),
                r#type: None,
                enabled: Some(iface.enabled),
                if_index: None,
                phys_address: None,
                oper_status: Some(if iface.enabled {
                    "up".into()
                } else {
                    "down".into()
                }),
            })
        })
        .build()
}

impl ProviderBase for TestMaster {
    fn yang_modules() -> &'static [&'static str] {
        &["iana-if-type", "ietf-interfaces"]
    }

    fn top_level_node(&self) -> String {
        "/ietf-interfaces:interfaces".to_owned()
    }

    fn debug_span(_name: &str) -> Span {
        debug_span!("test")
    }
}

#[async_trait]
impl netsync_northbound::configuration::Provider for TestMaster {
    type ListEntry = ListEntry;
    type Event = Event;
    type Resource = Resource;

    fn validation_callbacks() -> Option<&'static ValidationCallbacks> {
        Some(&VALIDATION_CALLBACKS)
    }

    fn callbacks() -> Option<&'static CfgCallbacks<TestMaster>> {
        Some(&CALLBACKS)
    }

    async fn process_event(&mut self, event: Event) -> Result<(), Error> {
        self.processed.push(event);
        Ok(())
    }
}

impl StateProvider for TestMaster {
    type ListEntry<'a> = StateListEntry<'a>;

    fn callbacks() -> &'static StateCallbacks<TestMaster> {
        &STATE_CALLBACKS
    }
}

// ===== helper functions =====

fn init_yang_ctx() {
    YANG_CTX.get_or_init(|| {
        let mut yang_ctx = netsync_yang::new_context();
        for module_name in TestMaster::yang_modules() {
            netsync_yang::load_module(&mut yang_ctx, module_name);
        }
        Arc::new(yang_ctx)
    });
}

fn tree(json: &str) -> DataTree<'static> {
    let yang_ctx = YANG_CTX.get().unwrap();
    DataTree::parse_string(
        yang_ctx,
        json,
        DataFormat::JSON,
        DataParserFlags::NO_VALIDATION,
        DataValidationFlags::NO_STATE,
    )
    .unwrap()
}

fn empty_tree() -> DataTree<'static> {
    let yang_ctx = YANG_CTX.get().unwrap();
    DataTree::new(yang_ctx)
}

fn diff_changes(
    old: &DataTree<'static>,
    new: &DataTree<'static>,
) -> ConfigChanges {
    let diff = old.diff(new, DataDiffFlags::DEFAULTS).unwrap();
    changes_from_diff(&diff)
}

async fn commit_phase(
    master: &mut TestMaster,
    resources: &mut Vec<Option<Resource>>,
    phase: CommitPhase,
    old: &Arc<DataTree<'static>>,
    new: &Arc<DataTree<'static>>,
    changes: ConfigChanges,
) -> Result<(), Error> {
    let (responder_tx, responder_rx) = oneshot::channel();
    let request =
        api::daemon::Request::Commit(api::daemon::CommitRequest {
            phase,
            old_config: old.clone(),
            new_config: new.clone(),
            changes,
            responder: Some(responder_tx),
        });
    process_northbound_msg(master, resources, request).await;
    responder_rx.await.unwrap().map(|_response| ())
}

async fn validate(
    master: &mut TestMaster,
    config: &Arc<DataTree<'static>>,
) -> Result<(), Error> {
    let (responder_tx, responder_rx) = oneshot::channel();
    let request =
        api::daemon::Request::Validate(api::daemon::ValidateRequest {
            config: config.clone(),
            responder: Some(responder_tx),
        });
    process_northbound_msg(master, &mut vec![], request).await;
    responder_rx.await.unwrap().map(|_response| ())
}

const LOOPBACK_CONFIG: &str = r#"
    {
      "ietf-interfaces:interfaces": {
        "interface": [
          {
            "name": "lo",
            "type": "iana-if-type:softwareLoopback",
            "enabled": true,
            "description": "test"
          }
        ]
      }
    }
"#;

// ===== tests =====

#[tokio::test]
async fn commit_applies_changes_and_drains_events() {
    init_yang_ctx();

    let mut master = TestMaster::default();
    let mut resources = vec![];
    let old = Arc::new(empty_tree());
    let new = Arc::new(tree(LOOPBACK_CONFIG));
    let changes = diff_changes(&old, &new);

    // The interface creation expands into one change per configured leaf.
    assert!(changes.iter().any(|(key, _)| {
        key.operation == CallbackOp::Create
            && key.path == interfaces::interface::PATH.as_str()
    }));
    assert!(changes.iter().any(|(key, _)| {
        key.operation == CallbackOp::Modify
            && key.path == interfaces::interface::description::PATH.as_str()
    }));

    commit_phase(
        &mut master,
        &mut resources,
        CommitPhase::Prepare,
        &old,
        &new,
        changes.clone(),
    )
    .await
    .unwrap();
    commit_phase(
        &mut master,
        &mut resources,
        CommitPhase::Apply,
        &old,
        &new,
        changes,
    )
    .await
    .unwrap();

    let iface = master.interfaces.get("lo").unwrap();
    assert!(iface.enabled);
    assert_eq!(iface.description.as_deref(), Some("test"));

    // The event queue is deduplicated and processed in variant order.
    assert_eq!(
        master.processed,
        vec![
            Event::InterfaceCreate("lo".to_owned()),
            Event::AdminStatusChange("lo".to_owned()),
        ]
    );
}

#[tokio::test]
async fn reapplying_same_config_yields_no_changes() {
    init_yang_ctx();

    let old = tree(LOOPBACK_CONFIG);
    let new = tree(LOOPBACK_CONFIG);
    assert!(diff_changes(&old, &new).is_empty());
}

#[tokio::test]
async fn prepare_rejection_aborts_transaction() {
    init_yang_ctx();

    let mut master = TestMaster::default();
    let mut resources = vec![];
    let old = Arc::new(empty_tree());
    let new = Arc::new(tree(
        r#"
        {
          "ietf-interfaces:interfaces": {
            "interface": [
              {
                "name": "tun0",
                "type": "iana-if-type:tunnel"
              }
            ]
          }
        }
        "#,
    ));
    let changes = diff_changes(&old, &new);

    let result = commit_phase(
        &mut master,
        &mut resources,
        CommitPhase::Prepare,
        &old,
        &new,
        changes.clone(),
    )
    .await;
    assert!(matches!(result, Err(Error::CfgCallback(_))));

    // Abort the transaction. No event may reach the provider.
    commit_phase(
        &mut master,
        &mut resources,
        CommitPhase::Abort,
        &old,
        &new,
        changes,
    )
    .await
    .unwrap();
    assert!(master.processed.is_empty());
}

#[tokio::test]
async fn validation_callbacks_reject_unsupported_type() {
    init_yang_ctx();

    let mut master = TestMaster::default();

    let config = Arc::new(tree(LOOPBACK_CONFIG));
    validate(&mut master, &config).await.unwrap();

    let config = Arc::new(tree(
        r#"
        {
          "ietf-interfaces:interfaces": {
            "interface": [
              {
                "name": "tun0",
                "type": "iana-if-type:tunnel"
              }
            ]
          }
        }
        "#,
    ));
    let result = validate(&mut master, &config).await;
    assert!(matches!(result, Err(Error::ValidationCallback(_))));
}

#[tokio::test]
async fn delete_produces_delete_change() {
    init_yang_ctx();

    let old = tree(LOOPBACK_CONFIG);
    let new = empty_tree();
    let changes = diff_changes(&old, &new);

    assert!(changes.iter().any(|(key, _)| {
        key.operation == CallbackOp::Delete
            && key.path == interfaces::interface::PATH.as_str()
    }));
    let (_, data_path) = changes
        .iter()
        .find(|(key, _)| key.operation == CallbackOp::Delete)
        .unwrap();
    assert!(data_path.contains("interface[name='lo']"));
}

#[tokio::test]
async fn get_renders_operational_state() {
    init_yang_ctx();

    let mut master = TestMaster::default();
    master.interfaces.insert(
        "eth0".to_owned(),
        TestInterface {
            enabled: false,
            description: None,
        },
    );
    master.interfaces.insert(
        "lo".to_owned(),
        TestInterface {
            enabled: true,
            description: Some("loopback".to_owned()),
        },
    );

    let (responder_tx, responder_rx) = oneshot::channel();
    let request = api::daemon::Request::Get(api::daemon::GetRequest {
        path: None,
        responder: Some(responder_tx),
    });
    process_northbound_msg(&mut master, &mut vec![], request).await;
    let response = responder_rx.await.unwrap().unwrap();

    let entries = response
        .data
        .find_xpath("/ietf-interfaces:interfaces/interface")
        .unwrap()
        .collect::<Vec<_>>();
    assert_eq!(entries.len(), 2);

    let rendered = response
        .data
        .print_string(DataFormat::JSON, DataPrinterFlags::WITH_SIBLINGS)
        .unwrap();
    assert!(rendered.contains("\"name\": \"lo\""));
    assert!(rendered.contains("\"description\": \"loopback\""));
    // Unset descriptions always render as empty strings.
    assert!(rendered.contains("\"description\": \"\""));
}
