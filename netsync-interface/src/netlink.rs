//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::IpAddr;

use capctl::caps::CapState;
use futures::TryStreamExt;
use futures::channel::mpsc::UnboundedReceiver;
use ipnetwork::IpNetwork;
use netlink_packet_core::{NetlinkMessage, NetlinkPayload};
use netlink_packet_route::RouteNetlinkMessage;
use netlink_packet_route::address::{AddressAttribute, AddressMessage};
use netlink_packet_route::link::{
    InfoKind, LinkAttribute, LinkFlag, LinkInfo, LinkLayerType, LinkMessage,
    State, Stats64,
};
use netlink_packet_route::neighbour::{
    NeighbourAddress, NeighbourAttribute, NeighbourMessage,
};
use netlink_sys::{AsyncSocket, SocketAddr};
use netsync_utils::southbound::InterfaceFlags;
use rtnetlink::{Handle, new_connection};
use tracing::error;

use crate::Master;
use crate::error::Error;
use crate::interface::{Counters, InterfaceType, OperStatus, Owner};
use crate::sysfs;

pub type NetlinkMonitor =
    UnboundedReceiver<(NetlinkMessage<RouteNetlinkMessage>, SocketAddr)>;

// Netlink multicast groups.
const RTNLGRP_LINK: u32 = 1;
const RTNLGRP_IPV4_IFADDR: u32 = 5;
const RTNLGRP_IPV6_IFADDR: u32 = 9;

// ===== helper functions =====

fn process_newlink_msg(master: &mut Master, msg: LinkMessage, notify: bool) {
    // Fetch interface attributes.
    let ifindex = msg.header.index;
    let mut ifname = None;
    let mut mtu = None;
    let mut phys_address = None;
    let mut oper_status = None;
    let mut counters = None;
    let mut kind = None;

    let mut flags = InterfaceFlags::empty();
    if msg.header.link_layer_type == LinkLayerType::Loopback {
        flags.insert(InterfaceFlags::LOOPBACK);
    }
    if msg.header.flags.contains(&LinkFlag::Up) {
        flags.insert(InterfaceFlags::ADMIN_UP);
    }
    if msg.header.flags.contains(&LinkFlag::Running) {
        flags.insert(InterfaceFlags::OPERATIVE);
    }
    if msg.header.flags.contains(&LinkFlag::Broadcast) {
        flags.insert(InterfaceFlags::BROADCAST);
    }

    for attr in &msg.attributes {
        match attr {
            LinkAttribute::IfName(value) => ifname = Some(value.clone()),
            LinkAttribute::Mtu(value) => mtu = Some(*value),
            LinkAttribute::Address(value) => {
                phys_address = Some(format_phys_addr(value));
            }
            LinkAttribute::OperState(value) => {
                oper_status = Some(oper_status_from_kernel(value));
            }
            LinkAttribute::LinkInfo(infos) => {
                kind = infos.iter().find_map(|info| match info {
                    LinkInfo::Kind(kind) => Some(kind.clone()),
                    _ => None,
                });
            }
            LinkAttribute::Stats64(value) => {
                counters = Some(counters_from_kernel(value));
            }
            _ => (),
        }
    }
    let (Some(ifname), Some(mtu)) = (ifname, mtu) else {
        return;
    };

    let iface_type = if flags.contains(InterfaceFlags::LOOPBACK) {
        InterfaceType::SoftwareLoopback
    } else {
        match kind {
            Some(InfoKind::Dummy) => InterfaceType::Other,
            Some(InfoKind::Bridge) => InterfaceType::Bridge,
            Some(InfoKind::Vlan) => InterfaceType::L2Vlan,
            _ => InterfaceType::EthernetCsmacd,
        }
    };

    // Not all kernel messages carry the operational status, so read it from
    // sysfs when it's missing.
    let oper_status =
        oper_status.unwrap_or_else(|| sysfs::oper_status(&ifname));

    // Add or update interface.
    master.interfaces.update(
        ifname,
        ifindex,
        mtu,
        flags,
        iface_type,
        phys_address,
        oper_status,
        counters,
        &master.ibus_tx,
        notify,
    );
}

fn process_dellink_msg(master: &mut Master, msg: LinkMessage, notify: bool) {
    // Fetch interface attributes.
    let ifindex = msg.header.index;

    if let Some(iface) = master.interfaces.get_by_ifindex(ifindex) {
        // Remove interface.
        let ifname = iface.name.clone();
        master
            .interfaces
            .remove(&ifname, Owner::SYSTEM, &master.ibus_tx, notify);
    }
}

fn process_newaddr_msg(master: &mut Master, msg: AddressMessage) {
    // Fetch address attributes.
    let ifindex = msg.header.index;
    let Some(addr) = parse_address(&msg) else {
        return;
    };

    // Add address to the interface.
    master.interfaces.addr_add(ifindex, addr);
}

fn process_deladdr_msg(master: &mut Master, msg: AddressMessage) {
    // Fetch address attributes.
    let ifindex = msg.header.index;
    let Some(addr) = parse_address(&msg) else {
        return;
    };

    // Remove address from the interface.
    master.interfaces.addr_del(ifindex, addr);
}

fn process_newneigh_msg(master: &mut Master, msg: NeighbourMessage) {
    // Fetch neighbor attributes.
    let ifindex = msg.header.ifindex;
    let mut addr = None;
    let mut lladdr = None;
    for attr in &msg.attributes {
        match attr {
            NeighbourAttribute::Destination(value) => {
                addr = neighbor_addr(value);
            }
            NeighbourAttribute::LinkLocalAddress(value) => {
                lladdr = Some(value.clone());
            }
            _ => (),
        }
    }
    let (Some(addr), Some(lladdr)) = (addr, lladdr) else {
        return;
    };

    // Add neighbor entry to the interface.
    master.interfaces.neighbor_add(ifindex, addr, lladdr);
}

fn parse_address(msg: &AddressMessage) -> Option<IpNetwork> {
    let addr = msg.attributes.iter().find_map(|attr| match attr {
        AddressAttribute::Address(value) => Some(*value),
        _ => None,
    })?;
    IpNetwork::new(addr, msg.header.prefix_len).ok()
}

fn neighbor_addr(addr: &NeighbourAddress) -> Option<IpAddr> {
    match addr {
        NeighbourAddress::Inet(addr) => Some(IpAddr::V4(*addr)),
        NeighbourAddress::Inet6(addr) => Some(IpAddr::V6(*addr)),
        _ => None,
    }
}

fn oper_status_from_kernel(state: &State) -> OperStatus {
    match state {
        State::Up => OperStatus::Up,
        State::Down => OperStatus::Down,
        State::Testing => OperStatus::Testing,
        State::Dormant => OperStatus::Dormant,
        State::NotPresent => OperStatus::NotPresent,
        State::LowerLayerDown => OperStatus::LowerLayerDown,
        _ => OperStatus::Unknown,
    }
}

fn counters_from_kernel(stats: &Stats64) -> Counters {
    Counters {
        in_octets: stats.rx_bytes,
        in_unicast_pkts: stats.rx_packets,
        in_errors: stats.rx_errors as u32,
        out_octets: stats.tx_bytes,
        out_unicast_pkts: stats.tx_packets,
        out_errors: stats.tx_errors as u32,
    }
}

// ===== global functions =====

// Formats a link-layer address as a colon-separated hex string.
pub(crate) fn format_phys_addr(addr: &[u8]) -> String {
    addr.iter()
        .map(|octet| format!("{octet:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

// Parses a colon-separated hex string into link-layer address bytes.
pub(crate) fn parse_phys_addr(addr: &str) -> Option<Vec<u8>> {
    if addr.is_empty() {
        return None;
    }
    addr.split(':')
        .map(|octet| u8::from_str_radix(octet, 16).ok())
        .collect()
}

// Sets the administrative status of an interface.
pub(crate) async fn admin_status_set(
    handle: &Handle,
    ifname: &str,
    ifindex: u32,
    enabled: bool,
) -> Result<(), Error> {
    // Create netlink request.
    let request = handle.link().set(ifindex);
    let request = if enabled { request.up() } else { request.down() };

    // Execute request.
    if let Err(error) = request.execute().await {
        error!(%ifname, %enabled, %error, "failed to set interface administrative status");
        return Err(Error::NetlinkRequest(error));
    }
    Ok(())
}

// Sets the MTU of an interface.
pub(crate) async fn mtu_set(
    handle: &Handle,
    ifname: &str,
    ifindex: u32,
    mtu: u32,
) -> Result<(), Error> {
    // Create netlink request.
    let request = handle.link().set(ifindex).mtu(mtu);

    // Execute request.
    if let Err(error) = request.execute().await {
        error!(%ifname, %mtu, %error, "failed to set interface MTU");
        return Err(Error::NetlinkRequest(error));
    }
    Ok(())
}

// Creates a dummy link with the given name.
pub(crate) async fn dummy_create(
    handle: &Handle,
    ifname: &str,
) -> Result<(), Error> {
    // Create netlink request.
    let request = handle.link().add().dummy(ifname.to_owned());

    // Execute request.
    if let Err(error) = request.execute().await {
        error!(%ifname, %error, "failed to create dummy interface");
        return Err(Error::NetlinkRequest(error));
    }
    Ok(())
}

// Deletes a link.
pub(crate) async fn link_delete(
    handle: &Handle,
    ifname: &str,
    ifindex: u32,
) -> Result<(), Error> {
    // Create netlink request.
    let request = handle.link().del(ifindex);

    // Execute request.
    if let Err(error) = request.execute().await {
        error!(%ifname, %error, "failed to delete interface");
        return Err(Error::NetlinkRequest(error));
    }
    Ok(())
}

// Installs an address in an interface.
pub(crate) async fn addr_install(
    handle: &Handle,
    ifname: &str,
    ifindex: u32,
    addr: &IpNetwork,
) -> Result<(), Error> {
    // Create netlink request.
    let request = handle.address().add(ifindex, addr.ip(), addr.prefix());

    // Execute request.
    if let Err(error) = request.execute().await {
        error!(%ifname, %addr, %error, "failed to install address");
        return Err(Error::NetlinkRequest(error));
    }
    Ok(())
}

// Uninstalls an address from an interface.
pub(crate) async fn addr_uninstall(
    handle: &Handle,
    ifname: &str,
    ifindex: u32,
    addr: &IpNetwork,
) -> Result<(), Error> {
    // Create netlink request.
    let mut request = handle.address().add(ifindex, addr.ip(), addr.prefix());

    // Execute request.
    let request = handle.address().del(request.message_mut().clone());
    if let Err(error) = request.execute().await {
        error!(%ifname, %addr, %error, "failed to uninstall address");
        return Err(Error::NetlinkRequest(error));
    }
    Ok(())
}

// Installs a static neighbor entry in an interface.
pub(crate) async fn neighbor_install(
    handle: &Handle,
    ifname: &str,
    ifindex: u32,
    addr: &IpAddr,
    lladdr: &[u8],
) -> Result<(), Error> {
    // Create netlink request.
    let request = handle
        .neighbours()
        .add(ifindex, *addr)
        .link_local_address(lladdr)
        .replace();

    // Execute request.
    if let Err(error) = request.execute().await {
        error!(%ifname, %addr, %error, "failed to install neighbor");
        return Err(Error::NetlinkRequest(error));
    }
    Ok(())
}

// Uninstalls a static neighbor entry from an interface.
pub(crate) async fn neighbor_uninstall(
    handle: &Handle,
    ifname: &str,
    ifindex: u32,
    addr: &IpAddr,
) -> Result<(), Error> {
    // Deleting a neighbor entry requires the full message from a dump.
    let mut neighbors = handle.neighbours().get().execute();
    while let Some(msg) = neighbors
        .try_next()
        .await
        .map_err(Error::NetlinkRequest)?
    {
        if msg.header.ifindex != ifindex
            || neighbor_destination(&msg) != Some(*addr)
        {
            continue;
        }

        if let Err(error) = handle.neighbours().del(msg).execute().await {
            error!(%ifname, %addr, %error, "failed to uninstall neighbor");
            return Err(Error::NetlinkRequest(error));
        }
        break;
    }
    Ok(())
}

fn neighbor_destination(msg: &NeighbourMessage) -> Option<IpAddr> {
    msg.attributes.iter().find_map(|attr| match attr {
        NeighbourAttribute::Destination(value) => neighbor_addr(value),
        _ => None,
    })
}

// Processes a message received by the netlink monitor.
pub(crate) fn process_msg(
    master: &mut Master,
    msg: NetlinkMessage<RouteNetlinkMessage>,
) {
    if let NetlinkPayload::InnerMessage(msg) = msg.payload {
        match msg {
            RouteNetlinkMessage::NewLink(msg) => {
                process_newlink_msg(master, msg, true)
            }
            RouteNetlinkMessage::DelLink(msg) => {
                process_dellink_msg(master, msg, true)
            }
            RouteNetlinkMessage::NewAddress(msg) => {
                process_newaddr_msg(master, msg)
            }
            RouteNetlinkMessage::DelAddress(msg) => {
                process_deladdr_msg(master, msg)
            }
            _ => (),
        }
    }
}

// Fetches a single link from the kernel and updates the interface
// entry right away, without waiting for the netlink monitor.
pub(crate) async fn fetch_link(master: &mut Master, ifname: &str) {
    let handle = master.netlink_handle.clone();
    let mut links =
        handle.link().get().match_name(ifname.to_owned()).execute();
    if let Ok(Some(msg)) = links.try_next().await {
        process_newlink_msg(master, msg, true);
    }
}

// Fetches interface information from the kernel.
pub(crate) async fn start(master: &mut Master) {
    let handle = master.netlink_handle.clone();

    // Fetch all interfaces.
    let mut links = handle.link().get().execute();
    while let Some(msg) = links
        .try_next()
        .await
        .expect("Failed to fetch interface information")
    {
        process_newlink_msg(master, msg, false);
    }

    // Fetch all interface addresses.
    let mut addresses = handle.address().get().execute();
    while let Some(msg) = addresses
        .try_next()
        .await
        .expect("Failed to fetch interface address information")
    {
        process_newaddr_msg(master, msg);
    }

    // Fetch all static neighbor entries.
    neighbor_dump(master, &handle).await;
}

// Fetches all neighbor entries from the kernel.
pub(crate) async fn neighbor_dump(master: &mut Master, handle: &Handle) {
    let mut neighbors = handle.neighbours().get().execute();
    while let Some(msg) = neighbors
        .try_next()
        .await
        .expect("Failed to fetch neighbor information")
    {
        process_newneigh_msg(master, msg);
    }
}

// Initializes the netlink sockets used to send requests to the kernel and to
// monitor network changes.
pub(crate) async fn init() -> (Handle, NetlinkMonitor) {
    // Create netlink socket.
    let (conn, handle, _) =
        new_connection().expect("Failed to create netlink socket");

    // Spawn the netlink connection on a separate thread with permanent
    // elevated capabilities.
    std::thread::spawn(|| {
        // Raise capabilities.
        let mut caps = CapState::get_current().unwrap();
        caps.effective = caps.permitted;
        if let Err(error) = caps.set_current() {
            error!("failed to update current capabilities: {}", error);
        }

        // Serve requests initiated by the netlink handle.
        futures::executor::block_on(conn)
    });

    // Start netlink monitor.
    let (mut conn, _, monitor) =
        new_connection().expect("Failed to create netlink socket");
    let groups = [RTNLGRP_LINK, RTNLGRP_IPV4_IFADDR, RTNLGRP_IPV6_IFADDR]
        .iter()
        .map(|group| 1 << (group - 1))
        .fold(0, std::ops::BitOr::bitor);
    let addr = SocketAddr::new(0, groups);
    conn.socket_mut()
        .socket_mut()
        .bind(&addr)
        .expect("Failed to bind netlink socket");
    tokio::spawn(conn);

    (handle, monitor)
}

// ===== tests =====

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phys_addr_conversion() {
        assert_eq!(
            format_phys_addr(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]),
            "00:11:22:33:44:55"
        );
        assert_eq!(
            parse_phys_addr("00:11:22:33:44:55"),
            Some(vec![0x00, 0x11, 0x22, 0x33, 0x44, 0x55])
        );
        assert_eq!(parse_phys_addr("de:ad:be:ef"), Some(vec![0xde, 0xad, 0xbe, 0xef]));
        assert_eq!(parse_phys_addr("00:11:zz"), None);
        assert_eq!(parse_phys_addr(""), None);
    }
}
