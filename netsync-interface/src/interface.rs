//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use bitflags::bitflags;
use chrono::{DateTime, Utc};
use generational_arena::{Arena, Index};
use ipnetwork::IpNetwork;
use netsync_northbound::yang::interfaces;
use netsync_utils::ibus::IbusChannelsTx;
use netsync_utils::southbound::{InterfaceFlags, InterfaceUpdateMsg};

#[derive(Debug, Default)]
pub struct Interfaces {
    // Interface arena.
    arena: Arena<Interface>,
    // Interface binary tree keyed by name.
    name_tree: BTreeMap<String, Index>,
    // Interface hash table keyed by ifindex.
    ifindex_tree: HashMap<u32, Index>,
}

#[derive(Debug)]
pub struct Interface {
    pub name: String,
    pub config: InterfaceCfg,
    pub owner: Owner,
    pub ifindex: Option<u32>,
    pub mtu: Option<u32>,
    pub flags: InterfaceFlags,
    pub iface_type: Option<InterfaceType>,
    pub phys_address: Option<String>,
    pub oper_status: OperStatus,
    pub discontinuity_time: DateTime<Utc>,
    pub counters: Counters,
    // Addresses present in the kernel.
    pub addresses: BTreeSet<IpNetwork>,
    // Static neighbor entries present in the kernel.
    pub neighbors: BTreeMap<IpAddr, Vec<u8>>,
    // Whether the underlying link was created by netsync.
    pub created: bool,
}

// Interface configuration.
#[derive(Debug)]
pub struct InterfaceCfg {
    pub enabled: bool,
    pub iface_type: Option<InterfaceType>,
    pub description: Option<String>,
    pub ipv4: Option<InterfaceIpv4Cfg>,
    pub ipv6: Option<InterfaceIpv6Cfg>,
}

// IPv4 configuration of an interface.
//
// Addresses are keyed by IP with the prefix length as the value, since
// the prefix length can change independently of the list entry.
#[derive(Debug)]
pub struct InterfaceIpv4Cfg {
    pub forwarding: bool,
    pub mtu: Option<u16>,
    pub addr_list: BTreeMap<Ipv4Addr, u8>,
    pub neighbors: BTreeMap<Ipv4Addr, String>,
}

// IPv6 configuration of an interface.
#[derive(Debug)]
pub struct InterfaceIpv6Cfg {
    pub forwarding: bool,
    pub mtu: Option<u32>,
    pub addr_list: BTreeMap<Ipv6Addr, u8>,
    pub neighbors: BTreeMap<Ipv6Addr, String>,
}

bitflags! {
    // Who owns an interface entry.
    //
    // An entry is dropped once neither the configuration nor the kernel
    // references it.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct Owner: u8 {
        const CONFIG = 0x01;
        const SYSTEM = 0x02;
    }
}

// Interface type, constrained to the supported subset of iana-if-type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InterfaceType {
    SoftwareLoopback,
    EthernetCsmacd,
    L2Vlan,
    Bridge,
    Other,
}

// Interface operational status.
//
// The values mirror the "oper-status" enumeration from ietf-interfaces.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperStatus {
    Up,
    Down,
    Testing,
    Unknown,
    Dormant,
    NotPresent,
    LowerLayerDown,
}

// Kernel-reported interface counters.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Counters {
    pub in_octets: u64,
    pub in_unicast_pkts: u64,
    pub in_errors: u32,
    pub out_octets: u64,
    pub out_unicast_pkts: u64,
    pub out_errors: u32,
}

// ===== impl Interfaces =====

impl Interfaces {
    // Adds an interface on behalf of the configuration.
    pub(crate) fn add(&mut self, ifname: String) -> &mut Interface {
        match self.name_tree.get(&ifname).copied() {
            Some(iface_idx) => {
                let iface = &mut self.arena[iface_idx];
                iface.owner.insert(Owner::CONFIG);
                iface
            }
            None => {
                let iface = Interface::new(ifname.clone(), Owner::CONFIG);
                let iface_idx = self.arena.insert(iface);
                self.name_tree.insert(ifname, iface_idx);
                &mut self.arena[iface_idx]
            }
        }
    }

    // Adds or updates an interface from kernel data.
    pub(crate) fn update(
        &mut self,
        ifname: String,
        ifindex: u32,
        mtu: u32,
        flags: InterfaceFlags,
        iface_type: InterfaceType,
        phys_address: Option<String>,
        oper_status: OperStatus,
        counters: Option<Counters>,
        ibus_tx: &IbusChannelsTx,
        notify: bool,
    ) {
        let changed = match self
            .ifindex_tree
            .get(&ifindex)
            .copied()
            .or_else(|| self.name_tree.get(&ifname).copied())
        {
            Some(iface_idx) => {
                let iface = &mut self.arena[iface_idx];

                // Handle interface renames.
                if iface.name != ifname {
                    self.name_tree.remove(&iface.name);
                    iface.name.clone_from(&ifname);
                    self.name_tree.insert(ifname.clone(), iface_idx);
                }

                let changed = iface.ifindex != Some(ifindex)
                    || iface.mtu != Some(mtu)
                    || iface.flags != flags;

                iface.owner.insert(Owner::SYSTEM);
                if iface.ifindex != Some(ifindex) {
                    if let Some(ifindex) = iface.ifindex.take() {
                        self.ifindex_tree.remove(&ifindex);
                    }
                    iface.ifindex = Some(ifindex);
                    self.ifindex_tree.insert(ifindex, iface_idx);
                }
                iface.mtu = Some(mtu);
                iface.flags = flags;
                iface.iface_type = Some(iface_type);
                iface.oper_status = oper_status;
                if phys_address.is_some() {
                    iface.phys_address = phys_address;
                }
                if let Some(counters) = counters {
                    iface.counters = counters;
                }

                changed
            }
            None => {
                let mut iface = Interface::new(ifname.clone(), Owner::SYSTEM);
                iface.ifindex = Some(ifindex);
                iface.mtu = Some(mtu);
                iface.flags = flags;
                iface.iface_type = Some(iface_type);
                iface.phys_address = phys_address;
                iface.oper_status = oper_status;
                iface.counters = counters.unwrap_or_default();

                let iface_idx = self.arena.insert(iface);
                self.name_tree.insert(ifname.clone(), iface_idx);
                self.ifindex_tree.insert(ifindex, iface_idx);
                true
            }
        };

        // Notify the other providers.
        if changed && notify {
            ibus_tx.interface_upd(InterfaceUpdateMsg {
                ifname,
                ifindex,
                mtu,
                flags,
            });
        }
    }

    // Removes ownership of an interface, dropping the entry once it's no
    // longer owned by anyone.
    pub(crate) fn remove(
        &mut self,
        ifname: &str,
        owner: Owner,
        ibus_tx: &IbusChannelsTx,
        notify: bool,
    ) {
        let Some(iface_idx) = self.name_tree.get(ifname).copied() else {
            return;
        };
        let iface = &mut self.arena[iface_idx];

        iface.owner.remove(owner);
        if owner.contains(Owner::CONFIG) {
            iface.config = Default::default();
        }
        if owner.contains(Owner::SYSTEM) {
            if let Some(ifindex) = iface.ifindex.take() {
                self.ifindex_tree.remove(&ifindex);
            }
            iface.mtu = None;
            iface.flags = InterfaceFlags::empty();
            iface.iface_type = None;
            iface.phys_address = None;
            iface.oper_status = OperStatus::Unknown;
            iface.counters = Default::default();
            iface.addresses.clear();
            iface.neighbors.clear();
            iface.created = false;

            // Notify the other providers.
            if notify {
                ibus_tx.interface_del(ifname.to_owned());
            }
        }

        if iface.owner.is_empty() {
            self.name_tree.remove(ifname);
            self.arena.remove(iface_idx);
        }
    }

    // Adds an address to the kernel cache of an interface.
    pub(crate) fn addr_add(&mut self, ifindex: u32, addr: IpNetwork) {
        if let Some(iface) = self.get_mut_by_ifindex(ifindex) {
            iface.addresses.insert(addr);
        }
    }

    // Removes an address from the kernel cache of an interface.
    pub(crate) fn addr_del(&mut self, ifindex: u32, addr: IpNetwork) {
        if let Some(iface) = self.get_mut_by_ifindex(ifindex) {
            iface.addresses.remove(&addr);
        }
    }

    // Adds a neighbor entry to the kernel cache of an interface.
    pub(crate) fn neighbor_add(
        &mut self,
        ifindex: u32,
        addr: IpAddr,
        lladdr: Vec<u8>,
    ) {
        if let Some(iface) = self.get_mut_by_ifindex(ifindex) {
            iface.neighbors.insert(addr, lladdr);
        }
    }

    // Returns a reference to the interface corresponding to the given name.
    pub(crate) fn get_by_name(&self, ifname: &str) -> Option<&Interface> {
        self.name_tree
            .get(ifname)
            .copied()
            .map(|iface_idx| &self.arena[iface_idx])
    }

    // Returns a mutable reference to the interface corresponding to the given
    // name.
    pub(crate) fn get_mut_by_name(
        &mut self,
        ifname: &str,
    ) -> Option<&mut Interface> {
        self.name_tree
            .get(ifname)
            .copied()
            .map(move |iface_idx| &mut self.arena[iface_idx])
    }

    // Returns a reference to the interface corresponding to the given ifindex.
    pub(crate) fn get_by_ifindex(&self, ifindex: u32) -> Option<&Interface> {
        self.ifindex_tree
            .get(&ifindex)
            .copied()
            .map(|iface_idx| &self.arena[iface_idx])
    }

    // Returns a mutable reference to the interface corresponding to the given
    // ifindex.
    pub(crate) fn get_mut_by_ifindex(
        &mut self,
        ifindex: u32,
    ) -> Option<&mut Interface> {
        self.ifindex_tree
            .get(&ifindex)
            .copied()
            .map(move |iface_idx| &mut self.arena[iface_idx])
    }

    // Returns an iterator visiting all interfaces in ascending name order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &'_ Interface> + '_ {
        self.name_tree.values().map(|iface_idx| &self.arena[*iface_idx])
    }
}

// ===== impl Interface =====

impl Interface {
    fn new(name: String, owner: Owner) -> Interface {
        Interface {
            name,
            config: Default::default(),
            owner,
            ifindex: None,
            mtu: None,
            flags: InterfaceFlags::empty(),
            iface_type: None,
            phys_address: None,
            oper_status: OperStatus::Unknown,
            discontinuity_time: Utc::now(),
            counters: Default::default(),
            addresses: Default::default(),
            neighbors: Default::default(),
            created: false,
        }
    }

    // Whether the interface is administratively enabled in the kernel.
    pub(crate) fn is_admin_up(&self) -> bool {
        self.flags.contains(InterfaceFlags::ADMIN_UP)
    }
}

// ===== impl InterfaceCfg =====

impl Default for InterfaceCfg {
    fn default() -> InterfaceCfg {
        let enabled = interfaces::interface::enabled::DFLT;

        InterfaceCfg {
            enabled,
            iface_type: None,
            description: None,
            ipv4: None,
            ipv6: None,
        }
    }
}

// ===== impl InterfaceIpv4Cfg =====

impl Default for InterfaceIpv4Cfg {
    fn default() -> InterfaceIpv4Cfg {
        let forwarding = interfaces::interface::ipv4::forwarding::DFLT;

        InterfaceIpv4Cfg {
            forwarding,
            mtu: None,
            addr_list: Default::default(),
            neighbors: Default::default(),
        }
    }
}

// ===== impl InterfaceIpv6Cfg =====

impl Default for InterfaceIpv6Cfg {
    fn default() -> InterfaceIpv6Cfg {
        let forwarding = interfaces::interface::ipv6::forwarding::DFLT;

        InterfaceIpv6Cfg {
            forwarding,
            mtu: None,
            addr_list: Default::default(),
            neighbors: Default::default(),
        }
    }
}

// ===== tests =====

#[cfg(test)]
mod tests {
    use netsync_utils::ibus::ibus_channels;

    use super::*;

    fn kernel_update(
        interfaces: &mut Interfaces,
        ifname: &str,
        ifindex: u32,
        ibus_tx: &IbusChannelsTx,
    ) {
        interfaces.update(
            ifname.to_owned(),
            ifindex,
            1500,
            InterfaceFlags::BROADCAST,
            InterfaceType::EthernetCsmacd,
            Some("00:11:22:33:44:55".to_owned()),
            OperStatus::Down,
            None,
            ibus_tx,
            false,
        );
    }

    #[test]
    fn ownership_lifecycle() {
        let (ibus_tx, _ibus_rx) = ibus_channels();
        let mut interfaces = Interfaces::default();

        // Interface learned from the kernel, then configured.
        kernel_update(&mut interfaces, "eth0", 2, &ibus_tx);
        interfaces.add("eth0".to_owned());
        let iface = interfaces.get_by_name("eth0").unwrap();
        assert_eq!(iface.owner, Owner::CONFIG | Owner::SYSTEM);
        assert_eq!(iface.ifindex, Some(2));

        // Kernel removal keeps the configured entry around.
        interfaces.remove("eth0", Owner::SYSTEM, &ibus_tx, true);
        let iface = interfaces.get_by_name("eth0").unwrap();
        assert_eq!(iface.owner, Owner::CONFIG);
        assert_eq!(iface.ifindex, None);
        assert!(interfaces.get_by_ifindex(2).is_none());

        // Configuration removal drops the entry entirely.
        interfaces.remove("eth0", Owner::CONFIG, &ibus_tx, true);
        assert!(interfaces.get_by_name("eth0").is_none());
    }

    #[test]
    fn interface_rename() {
        let (ibus_tx, _ibus_rx) = ibus_channels();
        let mut interfaces = Interfaces::default();

        kernel_update(&mut interfaces, "eth0", 2, &ibus_tx);
        kernel_update(&mut interfaces, "lan0", 2, &ibus_tx);
        assert!(interfaces.get_by_name("eth0").is_none());
        let iface = interfaces.get_by_name("lan0").unwrap();
        assert_eq!(iface.ifindex, Some(2));
        assert_eq!(interfaces.get_by_ifindex(2).unwrap().name, "lan0");
    }

    #[test]
    fn address_cache() {
        let (ibus_tx, _ibus_rx) = ibus_channels();
        let mut interfaces = Interfaces::default();
        let addr: IpNetwork = "172.16.1.1/24".parse().unwrap();

        kernel_update(&mut interfaces, "eth0", 2, &ibus_tx);
        interfaces.addr_add(2, addr);
        assert!(interfaces.get_by_name("eth0").unwrap().addresses.contains(&addr));
        interfaces.addr_del(2, addr);
        assert!(interfaces.get_by_name("eth0").unwrap().addresses.is_empty());

        // Unknown ifindexes are ignored.
        interfaces.addr_add(99, addr);
    }

    #[test]
    fn iteration_order() {
        let (ibus_tx, _ibus_rx) = ibus_channels();
        let mut interfaces = Interfaces::default();

        kernel_update(&mut interfaces, "eth1", 3, &ibus_tx);
        kernel_update(&mut interfaces, "eth0", 2, &ibus_tx);
        kernel_update(&mut interfaces, "lo", 1, &ibus_tx);
        let names = interfaces
            .iter()
            .map(|iface| iface.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["eth0", "eth1", "lo"]);
    }
}
