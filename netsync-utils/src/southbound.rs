//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::IpAddr;

use bitflags::bitflags;
use netsync_yang::{ToYang, TryFromYang};
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct InterfaceFlags: u8 {
        const LOOPBACK = 0x01;
        const OPERATIVE = 0x02;
        const BROADCAST = 0x04;
        const ADMIN_UP = 0x08;
    }
}

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub enum Nexthop {
    Address { ifindex: u32, addr: IpAddr },
    Interface { ifindex: u32 },
    Special(NexthopSpecial),
}

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub enum NexthopSpecial {
    Blackhole,
    Unreachable,
    Prohibit,
    Receive,
}

// ===== Ibus messages =====

#[derive(Clone, Debug)]
#[derive(Deserialize, Serialize)]
pub struct InterfaceUpdateMsg {
    pub ifname: String,
    pub ifindex: u32,
    pub mtu: u32,
    pub flags: InterfaceFlags,
}

// ===== impl NexthopSpecial =====

impl ToYang for NexthopSpecial {
    fn to_yang(&self) -> std::borrow::Cow<'static, str> {
        match self {
            NexthopSpecial::Blackhole => "blackhole".into(),
            NexthopSpecial::Unreachable => "unreachable".into(),
            NexthopSpecial::Prohibit => "prohibit".into(),
            NexthopSpecial::Receive => "receive".into(),
        }
    }
}

impl TryFromYang for NexthopSpecial {
    fn try_from_yang(identity: &str) -> Option<NexthopSpecial> {
        match identity {
            "blackhole" => Some(NexthopSpecial::Blackhole),
            "unreachable" => Some(NexthopSpecial::Unreachable),
            "prohibit" => Some(NexthopSpecial::Prohibit),
            "receive" => Some(NexthopSpecial::Receive),
            _ => None,
        }
    }
}
