//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

mod error;
mod interface;
mod netlink;
pub mod northbound;
mod sysctl;
mod sysfs;

use futures::StreamExt;
use netsync_northbound::{
    NbDaemonReceiver, NbDaemonSender, ProviderBase, process_northbound_msg,
};
use netsync_utils::ibus::IbusChannelsTx;
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::interface::Interfaces;
use crate::netlink::NetlinkMonitor;

pub struct Master {
    // Internal bus Tx channels.
    pub ibus_tx: IbusChannelsTx,
    // Netlink socket.
    pub netlink_handle: rtnetlink::Handle,
    // List of interfaces.
    pub interfaces: Interfaces,
}

// ===== impl Master =====

impl Master {
    async fn run(
        &mut self,
        mut nb_rx: NbDaemonReceiver,
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
                Some((msg, _)) = netlink_monitor.next() => {
                    netlink::process_msg(self, msg);
                }
            }
        }
    }
}

// ===== global functions =====

pub fn start(ibus_tx: IbusChannelsTx) -> NbDaemonSender {
    let (nb_daemon_tx, nb_daemon_rx) = mpsc::channel(4);

    tokio::spawn(async move {
        // Initialize netlink sockets.
        let (netlink_handle, netlink_monitor) = netlink::init().await;

        let mut master = Master {
            ibus_tx,
            netlink_handle,
            interfaces: Default::default(),
        };

        // Fetch interface information from the kernel.
        netlink::start(&mut master).await;

        // Run task main loop.
        let span = Master::debug_span("");
        master
            .run(nb_daemon_rx, netlink_monitor)
            .instrument(span)
            .await;
    });

    nb_daemon_tx
}
