//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock as Lazy;

use async_trait::async_trait;
use enum_as_inner::EnumAsInner;
use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use netsync_northbound::configuration::{
    Callbacks, CallbacksBuilder, Provider, ValidationCallbacks,
    ValidationCallbacksBuilder,
};
use netsync_northbound::error::Error;
use netsync_northbound::yang::interfaces;
use netsync_utils::ip::AddressFamily;
use netsync_utils::yang::DataNodeRefExt;
use netsync_yang::TryFromYang;
use yang4::data::DataNodeRef;

use crate::interface::{InterfaceType, Owner};
use crate::northbound::yang::netmask_to_plen;
use crate::{Master, netlink, sysctl};

static VALIDATION_CALLBACKS: Lazy<ValidationCallbacks> =
    Lazy::new(load_validation_callbacks);
static CALLBACKS: Lazy<Callbacks<Master>> = Lazy::new(load_callbacks);

#[derive(Debug, Default, EnumAsInner)]
pub enum ListEntry {
    #[default]
    None,
    Interface(String),
    Ipv4Address(String, Ipv4Addr),
    Ipv6Address(String, Ipv6Addr),
    Ipv4Neighbor(String, Ipv4Addr),
    Ipv6Neighbor(String, Ipv6Addr),
}

#[derive(Debug)]
pub enum Resource {}

// The variant order defines the processing order. Link creation comes
// first so follow-up events can see the new ifindex, and removals come
// before installations.
#[derive(Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Event {
    InterfaceCreate(String),
    InterfaceDelete(String),
    AdminStatusChange(String),
    MtuChange(String, AddressFamily),
    AddressUninstall(String, IpNetwork),
    AddressInstall(String, IpNetwork),
    NeighborUninstall(String, IpAddr),
    NeighborInstall(String, IpAddr),
    ForwardingChange(String, AddressFamily),
}

// ===== callbacks =====

fn load_callbacks() -> Callbacks<Master> {
    CallbacksBuilder::<Master>::default()
        .path(interfaces::interface::PATH)
        .create_apply(|master, args| {
            let ifname = args.dnode.get_string_relative("./name").unwrap();
            master.interfaces.add(ifname.clone());

            let event_queue = args.event_queue;
            event_queue.insert(Event::InterfaceCreate(ifname.clone()));
            event_queue.insert(Event::AdminStatusChange(ifname));
        })
        .delete_apply(|_master, args| {
            let ifname = args.list_entry.into_interface().unwrap();

            let event_queue = args.event_queue;
            event_queue.insert(Event::InterfaceDelete(ifname));
        })
        .lookup(|_master, _list_entry, dnode| {
            let ifname = dnode.get_string_relative("./name").unwrap();
            ListEntry::Interface(ifname)
        })
        .path(interfaces::interface::description::PATH)
        .modify_apply(|master, args| {
            let ifname = args.list_entry.into_interface().unwrap();
            let description = args.dnode.get_string();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            iface.config.description = Some(description);
        })
        .delete_apply(|master, args| {
            let ifname = args.list_entry.into_interface().unwrap();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            iface.config.description = None;
        })
        .path(interfaces::interface::r#type::PATH)
        .modify_apply(|master, args| {
            let ifname = args.list_entry.into_interface().unwrap();
            let iface_type = args.dnode.get_string();
            let iface_type =
                InterfaceType::try_from_yang(&iface_type).unwrap();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            iface.config.iface_type = Some(iface_type);

            let event_queue = args.event_queue;
            event_queue.insert(Event::InterfaceCreate(ifname));
        })
        .path(interfaces::interface::enabled::PATH)
        .modify_apply(|master, args| {
            let ifname = args.list_entry.into_interface().unwrap();
            let enabled = args.dnode.get_bool();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            iface.config.enabled = enabled;

            let event_queue = args.event_queue;
            event_queue.insert(Event::AdminStatusChange(ifname));
        })
        .path(interfaces::interface::ipv4::PATH)
        .create_apply(|master, args| {
            let ifname = args.list_entry.into_interface().unwrap();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            iface.config.ipv4 = Some(Default::default());

            let event_queue = args.event_queue;
            event_queue
                .insert(Event::ForwardingChange(ifname, AddressFamily::Ipv4));
        })
        .delete_apply(|master, args| {
            let ifname = args.list_entry.into_interface().unwrap();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            if let Some(config) = iface.config.ipv4.take() {
                let event_queue = args.event_queue;
                for (addr, plen) in &config.addr_list {
                    let addr = Ipv4Network::new(*addr, *plen).unwrap();
                    event_queue.insert(Event::AddressUninstall(
                        ifname.clone(),
                        addr.into(),
                    ));
                }
                for addr in config.neighbors.keys() {
                    event_queue.insert(Event::NeighborUninstall(
                        ifname.clone(),
                        (*addr).into(),
                    ));
                }
            }
        })
        .path(interfaces::interface::ipv4::forwarding::PATH)
        .modify_apply(|master, args| {
            let ifname = args.list_entry.into_interface().unwrap();
            let forwarding = args.dnode.get_bool();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            let config = iface.config.ipv4.as_mut().unwrap();
            config.forwarding = forwarding;

            let event_queue = args.event_queue;
            event_queue
                .insert(Event::ForwardingChange(ifname, AddressFamily::Ipv4));
        })
        .path(interfaces::interface::ipv4::mtu::PATH)
        .modify_apply(|master, args| {
            let ifname = args.list_entry.into_interface().unwrap();
            let mtu = args.dnode.get_u16();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            let config = iface.config.ipv4.as_mut().unwrap();
            config.mtu = Some(mtu);

            let event_queue = args.event_queue;
            event_queue
                .insert(Event::MtuChange(ifname, AddressFamily::Ipv4));
        })
        .delete_apply(|master, args| {
            let ifname = args.list_entry.into_interface().unwrap();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            let config = iface.config.ipv4.as_mut().unwrap();
            config.mtu = None;
        })
        .path(interfaces::interface::ipv4::address::PATH)
        .create_apply(|master, args| {
            let ifname = args.list_entry.into_interface().unwrap();
            let addr = args.dnode.get_ipv4_relative("./ip").unwrap();
            let plen = ipv4_subnet_plen(&args.dnode).unwrap();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            let config = iface.config.ipv4.as_mut().unwrap();
            config.addr_list.insert(addr, plen);

            let addr = Ipv4Network::new(addr, plen).unwrap();
            let event_queue = args.event_queue;
            event_queue.insert(Event::AddressInstall(ifname, addr.into()));
        })
        .delete_apply(|master, args| {
            let (ifname, addr) = args.list_entry.into_ipv4_address().unwrap();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            let config = iface.config.ipv4.as_mut().unwrap();
            if let Some(plen) = config.addr_list.remove(&addr) {
                let addr = Ipv4Network::new(addr, plen).unwrap();
                let event_queue = args.event_queue;
                event_queue
                    .insert(Event::AddressUninstall(ifname, addr.into()));
            }
        })
        .lookup(|_master, list_entry, dnode| {
            let ifname = list_entry.into_interface().unwrap();
            let addr = dnode.get_ipv4_relative("./ip").unwrap();
            ListEntry::Ipv4Address(ifname, addr)
        })
        .path(interfaces::interface::ipv4::address::prefix_length::PATH)
        .modify_apply(|master, args| {
            let (ifname, addr) = args.list_entry.into_ipv4_address().unwrap();
            let plen = args.dnode.get_u8();

            reprefix_ipv4_address(master, args.event_queue, ifname, addr, plen);
        })
        .delete_apply(|_master, _args| {
            // The mandatory "subnet" choice guarantees a replacement in
            // the same transaction.
        })
        .path(interfaces::interface::ipv4::address::netmask::PATH)
        .modify_apply(|master, args| {
            let (ifname, addr) = args.list_entry.into_ipv4_address().unwrap();
            let netmask = args.dnode.get_ipv4();
            let plen = netmask_to_plen(netmask).unwrap();

            reprefix_ipv4_address(master, args.event_queue, ifname, addr, plen);
        })
        .delete_apply(|_master, _args| {
            // The mandatory "subnet" choice guarantees a replacement in
            // the same transaction.
        })
        .path(interfaces::interface::ipv4::neighbor::PATH)
        .create_apply(|master, args| {
            let ifname = args.list_entry.into_interface().unwrap();
            let addr = args.dnode.get_ipv4_relative("./ip").unwrap();
            let lladdr = args
                .dnode
                .get_string_relative("./link-layer-address")
                .unwrap();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            let config = iface.config.ipv4.as_mut().unwrap();
            config.neighbors.insert(addr, lladdr);

            let event_queue = args.event_queue;
            event_queue.insert(Event::NeighborInstall(ifname, addr.into()));
        })
        .delete_apply(|master, args| {
            let (ifname, addr) = args.list_entry.into_ipv4_neighbor().unwrap();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            let config = iface.config.ipv4.as_mut().unwrap();
            config.neighbors.remove(&addr);

            let event_queue = args.event_queue;
            event_queue.insert(Event::NeighborUninstall(ifname, addr.into()));
        })
        .lookup(|_master, list_entry, dnode| {
            let ifname = list_entry.into_interface().unwrap();
            let addr = dnode.get_ipv4_relative("./ip").unwrap();
            ListEntry::Ipv4Neighbor(ifname, addr)
        })
        .path(interfaces::interface::ipv4::neighbor::link_layer_address::PATH)
        .modify_apply(|master, args| {
            let (ifname, addr) = args.list_entry.into_ipv4_neighbor().unwrap();
            let lladdr = args.dnode.get_string();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            let config = iface.config.ipv4.as_mut().unwrap();
            config.neighbors.insert(addr, lladdr);

            let event_queue = args.event_queue;
            event_queue.insert(Event::NeighborInstall(ifname, addr.into()));
        })
        .path(interfaces::interface::ipv6::PATH)
        .create_apply(|master, args| {
            let ifname = args.list_entry.into_interface().unwrap();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            iface.config.ipv6 = Some(Default::default());

            let event_queue = args.event_queue;
            event_queue
                .insert(Event::ForwardingChange(ifname, AddressFamily::Ipv6));
        })
        .delete_apply(|master, args| {
            let ifname = args.list_entry.into_interface().unwrap();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            if let Some(config) = iface.config.ipv6.take() {
                let event_queue = args.event_queue;
                for (addr, plen) in &config.addr_list {
                    let addr = Ipv6Network::new(*addr, *plen).unwrap();
                    event_queue.insert(Event::AddressUninstall(
                        ifname.clone(),
                        addr.into(),
                    ));
                }
                for addr in config.neighbors.keys() {
                    event_queue.insert(Event::NeighborUninstall(
                        ifname.clone(),
                        (*addr).into(),
                    ));
                }
            }
        })
        .path(interfaces::interface::ipv6::forwarding::PATH)
        .modify_apply(|master, args| {
            let ifname = args.list_entry.into_interface().unwrap();
            let forwarding = args.dnode.get_bool();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            let config = iface.config.ipv6.as_mut().unwrap();
            config.forwarding = forwarding;

            let event_queue = args.event_queue;
            event_queue
                .insert(Event::ForwardingChange(ifname, AddressFamily::Ipv6));
        })
        .path(interfaces::interface::ipv6::mtu::PATH)
        .modify_apply(|master, args| {
            let ifname = args.list_entry.into_interface().unwrap();
            let mtu = args.dnode.get_u32();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            let config = iface.config.ipv6.as_mut().unwrap();
            config.mtu = Some(mtu);

            let event_queue = args.event_queue;
            event_queue
                .insert(Event::MtuChange(ifname, AddressFamily::Ipv6));
        })
        .delete_apply(|master, args| {
            let ifname = args.list_entry.into_interface().unwrap();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            let config = iface.config.ipv6.as_mut().unwrap();
            config.mtu = None;
        })
        .path(interfaces::interface::ipv6::address::PATH)
        .create_apply(|master, args| {
            let ifname = args.list_entry.into_interface().unwrap();
            let addr = args.dnode.get_ipv6_relative("./ip").unwrap();
            let plen = args.dnode.get_u8_relative("./prefix-length").unwrap();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            let config = iface.config.ipv6.as_mut().unwrap();
            config.addr_list.insert(addr, plen);

            let addr = Ipv6Network::new(addr, plen).unwrap();
            let event_queue = args.event_queue;
            event_queue.insert(Event::AddressInstall(ifname, addr.into()));
        })
        .delete_apply(|master, args| {
            let (ifname, addr) = args.list_entry.into_ipv6_address().unwrap();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            let config = iface.config.ipv6.as_mut().unwrap();
            if let Some(plen) = config.addr_list.remove(&addr) {
                let addr = Ipv6Network::new(addr, plen).unwrap();
                let event_queue = args.event_queue;
                event_queue
                    .insert(Event::AddressUninstall(ifname, addr.into()));
            }
        })
        .lookup(|_master, list_entry, dnode| {
            let ifname = list_entry.into_interface().unwrap();
            let addr = dnode.get_ipv6_relative("./ip").unwrap();
            ListEntry::Ipv6Address(ifname, addr)
        })
        .path(interfaces::interface::ipv6::address::prefix_length::PATH)
        .modify_apply(|master, args| {
            let (ifname, addr) = args.list_entry.into_ipv6_address().unwrap();
            let plen = args.dnode.get_u8();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            let config = iface.config.ipv6.as_mut().unwrap();
            if let Some(old_plen) = config.addr_list.insert(addr, plen)
                && old_plen != plen
            {
                let old_addr = Ipv6Network::new(addr, old_plen).unwrap();
                let addr = Ipv6Network::new(addr, plen).unwrap();
                let event_queue = args.event_queue;
                event_queue.insert(Event::AddressUninstall(
                    ifname.clone(),
                    old_addr.into(),
                ));
                event_queue.insert(Event::AddressInstall(ifname, addr.into()));
            }
        })
        .path(interfaces::interface::ipv6::neighbor::PATH)
        .create_apply(|master, args| {
            let ifname = args.list_entry.into_interface().unwrap();
            let addr = args.dnode.get_ipv6_relative("./ip").unwrap();
            let lladdr = args
                .dnode
                .get_string_relative("./link-layer-address")
                .unwrap();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            let config = iface.config.ipv6.as_mut().unwrap();
            config.neighbors.insert(addr, lladdr);

            let event_queue = args.event_queue;
            event_queue.insert(Event::NeighborInstall(ifname, addr.into()));
        })
        .delete_apply(|master, args| {
            let (ifname, addr) = args.list_entry.into_ipv6_neighbor().unwrap();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            let config = iface.config.ipv6.as_mut().unwrap();
            config.neighbors.remove(&addr);

            let event_queue = args.event_queue;
            event_queue.insert(Event::NeighborUninstall(ifname, addr.into()));
        })
        .lookup(|_master, list_entry, dnode| {
            let ifname = list_entry.into_interface().unwrap();
            let addr = dnode.get_ipv6_relative("./ip").unwrap();
            ListEntry::Ipv6Neighbor(ifname, addr)
        })
        .path(interfaces::interface::ipv6::neighbor::link_layer_address::PATH)
        .modify_apply(|master, args| {
            let (ifname, addr) = args.list_entry.into_ipv6_neighbor().unwrap();
            let lladdr = args.dnode.get_string();

            let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
            let config = iface.config.ipv6.as_mut().unwrap();
            config.neighbors.insert(addr, lladdr);

            let event_queue = args.event_queue;
            event_queue.insert(Event::NeighborInstall(ifname, addr.into()));
        })
        .build()
}

fn load_validation_callbacks() -> ValidationCallbacks {
    ValidationCallbacksBuilder::default()
        .path(interfaces::interface::r#type::PATH)
        .validate(|args| {
            let iface_type = args.dnode.get_string();
            if InterfaceType::try_from_yang(&iface_type).is_none() {
                return Err(format!(
                    "unsupported interface type: {iface_type}"
                ));
            }

            Ok(())
        })
        .path(interfaces::interface::ipv4::address::netmask::PATH)
        .validate(|args| {
            let netmask = args.dnode.get_ipv4();
            if netmask_to_plen(netmask).is_none() {
                return Err(format!("non-contiguous netmask: {netmask}"));
            }

            Ok(())
        })
        .build()
}

// ===== impl Master =====

#[async_trait]
impl Provider for Master {
    type ListEntry = ListEntry;
    type Event = Event;
    type Resource = Resource;

    fn validation_callbacks() -> Option<&'static ValidationCallbacks> {
        Some(&VALIDATION_CALLBACKS)
    }

    fn callbacks() -> Option<&'static Callbacks<Master>> {
        Some(&CALLBACKS)
    }

    async fn process_event(&mut self, event: Event) -> Result<(), Error> {
        match event {
            Event::InterfaceCreate(ifname) => {
                // Create a dummy link for configured interfaces of type
                // "other" that have no kernel counterpart.
                if let Some(iface) = self.interfaces.get_by_name(&ifname)
                    && iface.config.iface_type == Some(InterfaceType::Other)
                    && iface.ifindex.is_none()
                {
                    let handle = self.netlink_handle.clone();
                    netlink::dummy_create(&handle, &ifname).await?;
                    if let Some(iface) =
                        self.interfaces.get_mut_by_name(&ifname)
                    {
                        iface.created = true;
                    }

                    // Make the new ifindex visible to follow-up events.
                    netlink::fetch_link(self, &ifname).await;
                }
            }
            Event::InterfaceDelete(ifname) => {
                // Collect the kernel cleanups before releasing the entry.
                let mut created = false;
                let mut ifindex = None;
                let mut addrs = vec![];
                let mut neighbors = vec![];
                if let Some(iface) = self.interfaces.get_by_name(&ifname) {
                    created = iface.created;
                    ifindex = iface.ifindex;
                    if let Some(config) = &iface.config.ipv4 {
                        addrs.extend(config.addr_list.iter().map(
                            |(addr, plen)| {
                                IpNetwork::from(
                                    Ipv4Network::new(*addr, *plen).unwrap(),
                                )
                            },
                        ));
                        neighbors.extend(
                            config.neighbors.keys().copied().map(IpAddr::from),
                        );
                    }
                    if let Some(config) = &iface.config.ipv6 {
                        addrs.extend(config.addr_list.iter().map(
                            |(addr, plen)| {
                                IpNetwork::from(
                                    Ipv6Network::new(*addr, *plen).unwrap(),
                                )
                            },
                        ));
                        neighbors.extend(
                            config.neighbors.keys().copied().map(IpAddr::from),
                        );
                    }
                    addrs.retain(|addr| iface.addresses.contains(addr));
                    neighbors
                        .retain(|addr| iface.neighbors.contains_key(addr));
                }

                if let Some(ifindex) = ifindex {
                    let handle = self.netlink_handle.clone();
                    if created {
                        // Deleting the link also removes its addresses
                        // and neighbor entries.
                        netlink::link_delete(&handle, &ifname, ifindex)
                            .await?;
                    } else {
                        for addr in addrs {
                            netlink::addr_uninstall(
                                &handle, &ifname, ifindex, &addr,
                            )
                            .await?;
                        }
                        for addr in neighbors {
                            netlink::neighbor_uninstall(
                                &handle, &ifname, ifindex, &addr,
                            )
                            .await?;
                            if let Some(iface) =
                                self.interfaces.get_mut_by_name(&ifname)
                            {
                                iface.neighbors.remove(&addr);
                            }
                        }
                    }
                }

                self.interfaces.remove(
                    &ifname,
                    Owner::CONFIG,
                    &self.ibus_tx,
                    true,
                );
            }
            Event::AdminStatusChange(ifname) => {
                if let Some(iface) = self.interfaces.get_by_name(&ifname)
                    && let Some(ifindex) = iface.ifindex
                    && iface.is_admin_up() != iface.config.enabled
                {
                    netlink::admin_status_set(
                        &self.netlink_handle,
                        &ifname,
                        ifindex,
                        iface.config.enabled,
                    )
                    .await?;
                }
            }
            Event::MtuChange(ifname, af) => {
                let Some(iface) = self.interfaces.get_by_name(&ifname) else {
                    return Ok(());
                };
                match af {
                    // The IPv4 MTU maps to the link-level MTU.
                    AddressFamily::Ipv4 => {
                        if let Some(mtu) = iface
                            .config
                            .ipv4
                            .as_ref()
                            .and_then(|config| config.mtu)
                            && let Some(ifindex) = iface.ifindex
                            && iface.mtu != Some(u32::from(mtu))
                        {
                            netlink::mtu_set(
                                &self.netlink_handle,
                                &ifname,
                                ifindex,
                                u32::from(mtu),
                            )
                            .await?;
                        }
                    }
                    // The IPv6 MTU is a per-interface sysctl.
                    AddressFamily::Ipv6 => {
                        if let Some(mtu) = iface
                            .config
                            .ipv6
                            .as_ref()
                            .and_then(|config| config.mtu)
                            && iface.ifindex.is_some()
                        {
                            sysctl::mtu6_set(&ifname, mtu)?;
                        }
                    }
                }
            }
            Event::AddressUninstall(ifname, addr) => {
                if let Some(iface) = self.interfaces.get_by_name(&ifname)
                    && let Some(ifindex) = iface.ifindex
                    && iface.addresses.contains(&addr)
                {
                    netlink::addr_uninstall(
                        &self.netlink_handle,
                        &ifname,
                        ifindex,
                        &addr,
                    )
                    .await?;
                }
            }
            Event::AddressInstall(ifname, addr) => {
                if let Some(iface) = self.interfaces.get_by_name(&ifname)
                    && let Some(ifindex) = iface.ifindex
                    && !iface.addresses.contains(&addr)
                {
                    netlink::addr_install(
                        &self.netlink_handle,
                        &ifname,
                        ifindex,
                        &addr,
                    )
                    .await?;
                }
            }
            Event::NeighborUninstall(ifname, addr) => {
                let Some(iface) = self.interfaces.get_by_name(&ifname) else {
                    return Ok(());
                };
                let Some(ifindex) = iface.ifindex else {
                    return Ok(());
                };
                if !iface.neighbors.contains_key(&addr) {
                    return Ok(());
                }

                netlink::neighbor_uninstall(
                    &self.netlink_handle,
                    &ifname,
                    ifindex,
                    &addr,
                )
                .await?;
                if let Some(iface) = self.interfaces.get_mut_by_name(&ifname)
                {
                    iface.neighbors.remove(&addr);
                }
            }
            Event::NeighborInstall(ifname, addr) => {
                let Some(iface) = self.interfaces.get_by_name(&ifname) else {
                    return Ok(());
                };
                let Some(ifindex) = iface.ifindex else {
                    return Ok(());
                };
                let lladdr = match &addr {
                    IpAddr::V4(addr) => iface
                        .config
                        .ipv4
                        .as_ref()
                        .and_then(|config| config.neighbors.get(addr)),
                    IpAddr::V6(addr) => iface
                        .config
                        .ipv6
                        .as_ref()
                        .and_then(|config| config.neighbors.get(addr)),
                };
                let Some(lladdr) =
                    lladdr.and_then(|lladdr| netlink::parse_phys_addr(lladdr))
                else {
                    return Ok(());
                };
                if iface.neighbors.get(&addr) == Some(&lladdr) {
                    return Ok(());
                }

                netlink::neighbor_install(
                    &self.netlink_handle,
                    &ifname,
                    ifindex,
                    &addr,
                    &lladdr,
                )
                .await?;
                self.interfaces.neighbor_add(ifindex, addr, lladdr);
            }
            Event::ForwardingChange(ifname, af) => {
                if let Some(iface) = self.interfaces.get_by_name(&ifname)
                    && iface.ifindex.is_some()
                {
                    let enabled = match af {
                        AddressFamily::Ipv4 => iface
                            .config
                            .ipv4
                            .as_ref()
                            .map(|config| config.forwarding),
                        AddressFamily::Ipv6 => iface
                            .config
                            .ipv6
                            .as_ref()
                            .map(|config| config.forwarding),
                    };
                    if let Some(enabled) = enabled {
                        sysctl::forwarding_set(&ifname, af, enabled)?;
                    }
                }
            }
        }

        Ok(())
    }
}

// ===== global functions =====

// Resolves the subnet of an IPv4 address, given either as a prefix
// length or as a dotted-quad netmask.
fn ipv4_subnet_plen(dnode: &DataNodeRef<'_>) -> Option<u8> {
    dnode.get_u8_relative("./prefix-length").or_else(|| {
        dnode
            .get_ipv4_relative("./netmask")
            .and_then(netmask_to_plen)
    })
}

fn reprefix_ipv4_address(
    master: &mut Master,
    event_queue: &mut BTreeSet<Event>,
    ifname: String,
    addr: Ipv4Addr,
    plen: u8,
) {
    let iface = master.interfaces.get_mut_by_name(&ifname).unwrap();
    let config = iface.config.ipv4.as_mut().unwrap();
    if let Some(old_plen) = config.addr_list.insert(addr, plen)
        && old_plen != plen
    {
        let old_addr = Ipv4Network::new(addr, old_plen).unwrap();
        let addr = Ipv4Network::new(addr, plen).unwrap();
        event_queue
            .insert(Event::AddressUninstall(ifname.clone(), old_addr.into()));
        event_queue.insert(Event::AddressInstall(ifname, addr.into()));
    }
}
