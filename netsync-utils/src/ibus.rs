//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::southbound::InterfaceUpdateMsg;
use crate::{UnboundedReceiver, UnboundedSender};

// Useful type definitions.
pub type IbusReceiver = UnboundedReceiver<IbusMsg>;
pub type IbusSender = UnboundedSender<IbusMsg>;

// Channels used for internal communication among the components.
#[derive(Clone, Debug)]
pub struct IbusChannelsTx {
    pub routing: UnboundedSender<IbusMsg>,
}

#[derive(Debug)]
pub struct IbusChannelsRx {
    pub routing: UnboundedReceiver<IbusMsg>,
}

// Ibus message for communication among the components.
#[derive(Clone, Debug)]
#[derive(Deserialize, Serialize)]
pub enum IbusMsg {
    // Interface update notification.
    InterfaceUpd(InterfaceUpdateMsg),
    // Interface delete notification.
    InterfaceDel(String),
}

// ===== impl IbusChannelsTx =====

impl IbusChannelsTx {
    // Notifies the routing component about an interface update.
    pub fn interface_upd(&self, msg: InterfaceUpdateMsg) {
        let _ = self.routing.send(IbusMsg::InterfaceUpd(msg));
    }

    // Notifies the routing component about an interface removal.
    pub fn interface_del(&self, ifname: String) {
        let _ = self.routing.send(IbusMsg::InterfaceDel(ifname));
    }
}

// ===== global functions =====

// Creates the ibus channels shared by all components.
pub fn ibus_channels() -> (IbusChannelsTx, IbusChannelsRx) {
    let (routing_tx, routing_rx) = mpsc::unbounded_channel();

    let tx = IbusChannelsTx {
        routing: routing_tx,
    };
    let rx = IbusChannelsRx {
        routing: routing_rx,
    };

    (tx, rx)
}
