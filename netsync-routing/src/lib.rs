//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

mod error;
mod ibus;
mod netlink;
pub mod northbound;
mod rib;

use std::collections::BTreeMap;

use derive_new::new;
use futures::StreamExt;
use ipnetwork::IpNetwork;
use netsync_northbound::{
    NbDaemonReceiver, NbDaemonSender, ProviderBase, process_northbound_msg,
};
use netsync_utils::ibus::IbusChannelsRx;
use netsync_utils::protocol::Protocol;
use netsync_utils::southbound::InterfaceFlags;
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::netlink::NetlinkMonitor;
use crate::rib::{Rib, StaticRoute};

pub struct Master {
    // Netlink socket.
    pub netlink_handle: rtnetlink::Handle,
    // List of interfaces.
    pub interfaces: BTreeMap<String, Interface>,
    // Control-plane protocol instances.
    pub instances: BTreeMap<InstanceId, Instance>,
    // RIB.
    pub rib: Rib,
}

#[derive(Debug, Eq, Ord, PartialEq, PartialOrd)]
#[derive(new)]
pub struct InstanceId {
    // Instance protocol.
    pub protocol: Protocol,
    // Instance name.
    pub name: String,
}

// Control-plane protocol configuration data.
//
// Static routes are kept per instance so that deleting an instance can
// withdraw exactly the routes it owns.
#[derive(Debug, Default)]
pub struct Instance {
    pub description: Option<String>,
    pub static_routes: BTreeMap<IpNetwork, StaticRoute>,
}

#[derive(Debug)]
#[derive(new)]
pub struct Interface {
    pub ifname: String,
    pub ifindex: u32,
    pub flags: InterfaceFlags,
}

// ===== impl Master =====

impl Master {
    async fn run(
        &mut self,
        mut nb_rx: NbDaemonReceiver,
        mut ibus_rx: IbusChannelsRx,
        mut netlink_monitor: NetlinkMonitor,
    ) {
        let mut resources = vec![];

        loop {
            tokio::select! {
                Some(request) = nb_rx.recv() => {
                    process_northbound_msg(
                        self,
                        &mut resources,
                        request,
                    )
                    .await;
                }
                Some(msg) = ibus_rx.routing.recv() => {
                    ibus::process_msg(self, msg);
                }
                Some(_) = self.rib.update_queue_rx.recv() => {
                    self.rib.process_update_queue();
                }
                Some((msg, _)) = netlink_monitor.next() => {
                    netlink::process_msg(self, msg);
                }
            }
        }
    }
}

// ===== global functions =====

pub fn start(ibus_rx: IbusChannelsRx) -> NbDaemonSender {
    let (nb_daemon_tx, nb_daemon_rx) = mpsc::channel(4);

    tokio::spawn(async move {
        // Initialize netlink sockets.
        let (netlink_handle, netlink_monitor) = netlink::init().await;

        let mut master = Master {
            netlink_handle,
            interfaces: Default::default(),
            instances: Default::default(),
            rib: Default::default(),
        };

        // Fetch route information from the kernel.
        netlink::start(&mut master).await;

        // Run task main loop.
        let span = Master::debug_span("");
        master
            .run(nb_daemon_rx, ibus_rx, netlink_monitor)
            .instrument(span)
            .await;
    });

    nb_daemon_tx
}
