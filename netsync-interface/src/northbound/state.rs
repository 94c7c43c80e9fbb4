//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::borrow::Cow;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock as Lazy;

use enum_as_inner::EnumAsInner;
use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use netsync_northbound::state::{
    Callbacks, CallbacksBuilder, ListEntryKind, Provider,
};
use netsync_northbound::yang::interfaces;
use netsync_yang::ToYang;

use crate::interface::{Interface, OperStatus};
use crate::{Master, netlink};

pub static CALLBACKS: Lazy<Callbacks<Master>> = Lazy::new(load_callbacks);

#[derive(Debug, Default)]
#[derive(EnumAsInner)]
pub enum ListEntry<'a> {
    #[default]
    None,
    Interface(&'a Interface),
    Ipv4Address(Ipv4Network),
    Ipv6Address(Ipv6Network),
    Ipv4Neighbor(Ipv4Addr, &'a [u8]),
    Ipv6Neighbor(Ipv6Addr, &'a [u8]),
}

// ===== callbacks =====

fn load_callbacks() -> Callbacks<Master> {
    CallbacksBuilder::<Master>::default()
        .path(interfaces::interface::PATH)
        .get_iterate(|master, _args| {
            let iter = master.interfaces.iter().map(ListEntry::Interface);
            Some(Box::new(iter))
        })
        .get_object(|_master, args| {
            use interfaces::interface::Interface;
            let iface = args.list_entry.as_interface().unwrap();
            Box::new(Interface {
                name: iface.name.as_str().into(),
                description: Some(
                    iface
                        .config
                        .description
                        .as_deref()
                        .unwrap_or_default()
                        .into(),
                ),
                r#type: iface.iface_type.map(|iface_type| iface_type.to_yang()),
                enabled: Some(iface.oper_status == OperStatus::Up),
                if_index: iface.ifindex.map(|ifindex| ifindex as i32),
                phys_address: iface.phys_address.as_deref().map(Cow::Borrowed),
                oper_status: Some(iface.oper_status.to_yang()),
            })
        })
        .path(interfaces::interface::statistics::PATH)
        .get_object(|_master, args| {
            use interfaces::interface::statistics::Statistics;
            let iface = args.list_entry.as_interface().unwrap();
            Box::new(Statistics {
                discontinuity_time: Some(Cow::Borrowed(
                    &iface.discontinuity_time,
                )),
                in_octets: Some(iface.counters.in_octets),
                in_unicast_pkts: Some(iface.counters.in_unicast_pkts),
                in_errors: Some(iface.counters.in_errors),
                out_octets: Some(iface.counters.out_octets),
                out_unicast_pkts: Some(iface.counters.out_unicast_pkts),
                out_errors: Some(iface.counters.out_errors),
            })
        })
        .path(interfaces::interface::ipv4::PATH)
        .get_object(|_master, args| {
            use interfaces::interface::ipv4::Ipv4;
            let iface = args.list_entry.as_interface().unwrap();
            let config = iface.config.ipv4.as_ref();
            Box::new(Ipv4 {
                forwarding: config.map(|config| config.forwarding),
                mtu: config.and_then(|config| config.mtu),
            })
        })
        .path(interfaces::interface::ipv4::address::PATH)
        .get_iterate(|_master, args| {
            let iface = args.parent_list_entry.as_interface().unwrap();
            let iter = iface.addresses.iter().filter_map(|addr| match addr {
                IpNetwork::V4(addr) => Some(ListEntry::Ipv4Address(*addr)),
                IpNetwork::V6(_) => None,
            });
            Some(Box::new(iter))
        })
        .get_object(|_master, args| {
            use interfaces::interface::ipv4::address::Address;
            let addr = args.list_entry.as_ipv4_address().unwrap();
            Box::new(Address {
                ip: Cow::Owned(addr.ip()),
                prefix_length: Some(addr.prefix()),
            })
        })
        .path(interfaces::interface::ipv4::neighbor::PATH)
        .get_iterate(|_master, args| {
            let iface = args.parent_list_entry.as_interface().unwrap();
            let iter =
                iface
                    .neighbors
                    .iter()
                    .filter_map(|(addr, lladdr)| match addr {
                        IpAddr::V4(addr) => Some(ListEntry::Ipv4Neighbor(
                            *addr,
                            lladdr.as_slice(),
                        )),
                        IpAddr::V6(_) => None,
                    });
            Some(Box::new(iter))
        })
        .get_object(|_master, args| {
            use interfaces::interface::ipv4::neighbor::Neighbor;
            let (addr, lladdr) = args.list_entry.as_ipv4_neighbor().unwrap();
            Box::new(Neighbor {
                ip: Cow::Owned(*addr),
                link_layer_address: Some(
                    netlink::format_phys_addr(lladdr).into(),
                ),
            })
        })
        .path(interfaces::interface::ipv6::PATH)
        .get_object(|_master, args| {
            use interfaces::interface::ipv6::Ipv6;
            let iface = args.list_entry.as_interface().unwrap();
            let config = iface.config.ipv6.as_ref();
            Box::new(Ipv6 {
                forwarding: config.map(|config| config.forwarding),
                mtu: config.and_then(|config| config.mtu),
            })
        })
        .path(interfaces::interface::ipv6::address::PATH)
        .get_iterate(|_master, args| {
            let iface = args.parent_list_entry.as_interface().unwrap();
            let iter = iface.addresses.iter().filter_map(|addr| match addr {
                IpNetwork::V6(addr) => Some(ListEntry::Ipv6Address(*addr)),
                IpNetwork::V4(_) => None,
            });
            Some(Box::new(iter))
        })
        .get_object(|_master, args| {
            use interfaces::interface::ipv6::address::Address;
            let addr = args.list_entry.as_ipv6_address().unwrap();
            Box::new(Address {
                ip: Cow::Owned(addr.ip()),
                prefix_length: Some(addr.prefix()),
            })
        })
        .path(interfaces::interface::ipv6::neighbor::PATH)
        .get_iterate(|_master, args| {
            let iface = args.parent_list_entry.as_interface().unwrap();
            let iter =
                iface
                    .neighbors
                    .iter()
                    .filter_map(|(addr, lladdr)| match addr {
                        IpAddr::V6(addr) => Some(ListEntry::Ipv6Neighbor(
                            *addr,
                            lladdr.as_slice(),
                        )),
                        IpAddr::V4(_) => None,
                    });
            Some(Box::new(iter))
        })
        .get_object(|_master, args| {
            use interfaces::interface::ipv6::neighbor::Neighbor;
            let (addr, lladdr) = args.list_entry.as_ipv6_neighbor().unwrap();
            Box::new(Neighbor {
                ip: Cow::Owned(*addr),
                link_layer_address: Some(
                    netlink::format_phys_addr(lladdr).into(),
                ),
            })
        })
        .build()
}

// ===== impl Master =====

impl Provider for Master {
    type ListEntry<'a> = ListEntry<'a>;

    fn callbacks() -> &'static Callbacks<Master> {
        &CALLBACKS
    }
}

// ===== impl ListEntry =====

impl ListEntryKind for ListEntry<'_> {}
