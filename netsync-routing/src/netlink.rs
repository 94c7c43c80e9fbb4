//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use capctl::caps::CapState;
use futures::TryStreamExt;
use futures::channel::mpsc::UnboundedReceiver;
use ipnetwork::IpNetwork;
use netlink_packet_core::{NetlinkMessage, NetlinkPayload};
use netlink_packet_route::route::{
    RouteAddress, RouteAttribute, RouteHeader, RouteMessage, RouteProtocol,
    RouteType,
};
use netlink_packet_route::{AddressFamily, RouteNetlinkMessage};
use netlink_sys::{AsyncSocket, SocketAddr};
use netsync_utils::protocol::Protocol;
use netsync_utils::southbound::{Nexthop, NexthopSpecial};
use rtnetlink::{Handle, IpVersion, RouteAddRequest, new_connection};
use tracing::error;

use crate::Master;
use crate::error::Error;
use crate::rib::{DISTANCE_DIRECT, DISTANCE_STATIC};

pub type NetlinkMonitor =
    UnboundedReceiver<(NetlinkMessage<RouteNetlinkMessage>, SocketAddr)>;

// Netlink multicast groups.
const RTNLGRP_IPV4_ROUTE: u32 = 7;
const RTNLGRP_IPV6_ROUTE: u32 = 11;

// ===== helper functions =====

fn netlink_protocol(protocol: Protocol) -> RouteProtocol {
    match protocol {
        Protocol::Static => RouteProtocol::Static,
        Protocol::Direct => RouteProtocol::Unspec,
    }
}

fn netlink_route_type(nexthop: NexthopSpecial) -> RouteType {
    match nexthop {
        NexthopSpecial::Blackhole => RouteType::BlackHole,
        NexthopSpecial::Unreachable => RouteType::Unreachable,
        NexthopSpecial::Prohibit => RouteType::Prohibit,
        NexthopSpecial::Receive => RouteType::Local,
    }
}

fn process_newroute_msg(master: &mut Master, msg: RouteMessage) {
    let Some((prefix, protocol, metric, nexthops)) = parse_route_msg(&msg)
    else {
        return;
    };

    let distance = match protocol {
        Protocol::Static => DISTANCE_STATIC,
        Protocol::Direct => DISTANCE_DIRECT,
    };
    master
        .rib
        .route_add(prefix, protocol, distance, metric, nexthops);
}

fn process_delroute_msg(master: &mut Master, msg: RouteMessage) {
    let Some((prefix, protocol, ..)) = parse_route_msg(&msg) else {
        return;
    };

    master.rib.route_del(prefix, protocol);
}

// Extracts the destination prefix, protocol, metric and nexthops from a
// kernel route message.
//
// Routes outside of the main table are ignored, and so are route types other
// than unicast and the special drop types.
fn parse_route_msg(
    msg: &RouteMessage,
) -> Option<(IpNetwork, Protocol, u32, BTreeSet<Nexthop>)> {
    if msg.header.table != RouteHeader::RT_TABLE_MAIN {
        return None;
    }

    let special = match msg.header.kind {
        RouteType::Unicast => None,
        RouteType::BlackHole => Some(NexthopSpecial::Blackhole),
        RouteType::Unreachable => Some(NexthopSpecial::Unreachable),
        RouteType::Prohibit => Some(NexthopSpecial::Prohibit),
        _ => return None,
    };

    // Fetch route attributes.
    let mut dest = None;
    let mut gateway = None;
    let mut ifindex = None;
    let mut metric = 0;
    for attr in &msg.attributes {
        match attr {
            RouteAttribute::Destination(addr) => dest = route_addr(addr),
            RouteAttribute::Gateway(addr) => gateway = route_addr(addr),
            RouteAttribute::Oif(value) => ifindex = Some(*value),
            RouteAttribute::Priority(value) => metric = *value,
            _ => (),
        }
    }

    // Default routes carry no destination attribute.
    let dest = dest.or(match msg.header.address_family {
        AddressFamily::Inet => Some(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
        AddressFamily::Inet6 => Some(IpAddr::V6(Ipv6Addr::UNSPECIFIED)),
        _ => None,
    })?;
    let prefix =
        IpNetwork::new(dest, msg.header.destination_prefix_length).ok()?;

    let mut nexthops = BTreeSet::new();
    if let Some(special) = special {
        nexthops.insert(Nexthop::Special(special));
    } else if let Some(addr) = gateway {
        nexthops.insert(Nexthop::Address {
            ifindex: ifindex.unwrap_or(0),
            addr,
        });
    } else if let Some(ifindex) = ifindex {
        nexthops.insert(Nexthop::Interface { ifindex });
    }

    let protocol = match msg.header.protocol {
        RouteProtocol::Static => Protocol::Static,
        _ => Protocol::Direct,
    };

    Some((prefix, protocol, metric, nexthops))
}

fn route_addr(addr: &RouteAddress) -> Option<IpAddr> {
    match addr {
        RouteAddress::Inet(addr) => Some(IpAddr::V4(*addr)),
        RouteAddress::Inet6(addr) => Some(IpAddr::V6(*addr)),
        _ => None,
    }
}

fn add_nexthops_ipv4<'a>(
    mut request: RouteAddRequest<Ipv4Addr>,
    nexthops: impl Iterator<Item = &'a Nexthop>,
) -> RouteAddRequest<Ipv4Addr> {
    for nexthop in nexthops {
        request = match nexthop {
            Nexthop::Address { addr, ifindex } => {
                if let IpAddr::V4(addr) = addr {
                    let request = request.gateway(*addr);
                    if *ifindex != 0 {
                        request.output_interface(*ifindex)
                    } else {
                        request
                    }
                } else {
                    request
                }
            }
            Nexthop::Interface { ifindex } => {
                request.output_interface(*ifindex)
            }
            Nexthop::Special(special) => {
                let mut request = request;
                request.message_mut().header.kind =
                    netlink_route_type(*special);
                request
            }
        };
    }

    request
}

fn add_nexthops_ipv6<'a>(
    mut request: RouteAddRequest<Ipv6Addr>,
    nexthops: impl Iterator<Item = &'a Nexthop>,
) -> RouteAddRequest<Ipv6Addr> {
    for nexthop in nexthops {
        request = match nexthop {
            Nexthop::Address { addr, ifindex } => {
                if let IpAddr::V6(addr) = addr {
                    let request = request.gateway(*addr);
                    if *ifindex != 0 {
                        request.output_interface(*ifindex)
                    } else {
                        request
                    }
                } else {
                    request
                }
            }
            Nexthop::Interface { ifindex } => {
                request.output_interface(*ifindex)
            }
            Nexthop::Special(special) => {
                let mut request = request;
                request.message_mut().header.kind =
                    netlink_route_type(*special);
                request
            }
        };
    }

    request
}

// ===== netlink requests =====

// Installs a route in the kernel, replacing any previous route for the same
// destination and protocol.
pub(crate) async fn route_install(
    handle: &Handle,
    prefix: &IpNetwork,
    nexthops: &BTreeSet<Nexthop>,
    protocol: Protocol,
) -> Result<(), Error> {
    // Create netlink request.
    let mut request = handle.route().add();

    // Set route protocol.
    request = request.protocol(netlink_protocol(protocol));

    match prefix {
        IpNetwork::V4(prefix) => {
            // Set destination prefix.
            let mut request = request
                .v4()
                .replace()
                .destination_prefix(prefix.ip(), prefix.prefix());

            // Add nexthops.
            request = add_nexthops_ipv4(request, nexthops.iter());

            // Execute request.
            if let Err(error) = request.execute().await {
                error!(%prefix, %error, "failed to install route");
                return Err(Error::NetlinkRequest(error));
            }
        }
        IpNetwork::V6(prefix) => {
            // Set destination prefix.
            let mut request = request
                .v6()
                .replace()
                .destination_prefix(prefix.ip(), prefix.prefix());

            // Add nexthops.
            request = add_nexthops_ipv6(request, nexthops.iter());

            // Execute request.
            if let Err(error) = request.execute().await {
                error!(%prefix, %error, "failed to install route");
                return Err(Error::NetlinkRequest(error));
            }
        }
    }
    Ok(())
}

// Uninstalls a route from the kernel.
pub(crate) async fn route_uninstall(
    handle: &Handle,
    prefix: &IpNetwork,
    protocol: Protocol,
) -> Result<(), Error> {
    // Create netlink request.
    let mut request = handle.route().add();

    // Set route protocol.
    request = request.protocol(netlink_protocol(protocol));

    match prefix {
        IpNetwork::V4(prefix) => {
            // Set destination prefix.
            let mut request = request
                .v4()
                .destination_prefix(prefix.ip(), prefix.prefix());

            // Execute request.
            let request = handle.route().del(request.message_mut().clone());
            if let Err(error) = request.execute().await {
                error!(%prefix, %error, "failed to uninstall route");
                return Err(Error::NetlinkRequest(error));
            }
        }
        IpNetwork::V6(prefix) => {
            // Set destination prefix.
            let mut request = request
                .v6()
                .destination_prefix(prefix.ip(), prefix.prefix());

            // Execute request.
            let request = handle.route().del(request.message_mut().clone());
            if let Err(error) = request.execute().await {
                error!(%prefix, %error, "failed to uninstall route");
                return Err(Error::NetlinkRequest(error));
            }
        }
    }
    Ok(())
}

// Processes a message received by the netlink monitor.
pub(crate) fn process_msg(
    master: &mut Master,
    msg: NetlinkMessage<RouteNetlinkMessage>,
) {
    if let NetlinkPayload::InnerMessage(msg) = msg.payload {
        match msg {
            RouteNetlinkMessage::NewRoute(msg) => {
                process_newroute_msg(master, msg)
            }
            RouteNetlinkMessage::DelRoute(msg) => {
                process_delroute_msg(master, msg)
            }
            _ => (),
        }
    }
}

// Fetches route information from the kernel.
pub(crate) async fn start(master: &mut Master) {
    let handle = master.netlink_handle.clone();

    // Fetch all IPv4 routes.
    let mut routes = handle.route().get(IpVersion::V4).execute();
    while let Some(msg) = routes
        .try_next()
        .await
        .expect("Failed to fetch route information")
    {
        process_newroute_msg(master, msg);
    }

    // Fetch all IPv6 routes.
    let mut routes = handle.route().get(IpVersion::V6).execute();
    while let Some(msg) = routes
        .try_next()
        .await
        .expect("Failed to fetch route information")
    {
        process_newroute_msg(master, msg);
    }
}

// Initializes the netlink sockets used to send requests to the kernel and to
// monitor routing table changes.
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
    let groups = [RTNLGRP_IPV4_ROUTE, RTNLGRP_IPV6_ROUTE]
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

    fn route_msg_template() -> RouteMessage {
        let mut msg = RouteMessage::default();
        msg.header.address_family = AddressFamily::Inet;
        msg.header.table = RouteHeader::RT_TABLE_MAIN;
        msg.header.protocol = RouteProtocol::Static;
        msg.header.kind = RouteType::Unicast;
        msg
    }

    #[test]
    fn parse_gateway_route() {
        let mut msg = route_msg_template();
        msg.header.destination_prefix_length = 24;
        msg.attributes.push(RouteAttribute::Destination(
            RouteAddress::Inet("192.168.100.0".parse().unwrap()),
        ));
        msg.attributes.push(RouteAttribute::Gateway(RouteAddress::Inet(
            "10.0.2.1".parse().unwrap(),
        )));
        msg.attributes.push(RouteAttribute::Oif(2));
        msg.attributes.push(RouteAttribute::Priority(100));

        let (prefix, protocol, metric, nexthops) =
            parse_route_msg(&msg).unwrap();
        assert_eq!(prefix, "192.168.100.0/24".parse().unwrap());
        assert_eq!(protocol, Protocol::Static);
        assert_eq!(metric, 100);
        assert_eq!(
            nexthops,
            [Nexthop::Address {
                ifindex: 2,
                addr: "10.0.2.1".parse().unwrap(),
            }]
            .into()
        );
    }

    #[test]
    fn parse_default_route() {
        // Default routes have no destination attribute.
        let mut msg = route_msg_template();
        msg.header.protocol = RouteProtocol::Dhcp;
        msg.attributes.push(RouteAttribute::Gateway(RouteAddress::Inet(
            "10.0.2.1".parse().unwrap(),
        )));

        let (prefix, protocol, _, _) = parse_route_msg(&msg).unwrap();
        assert_eq!(prefix, "0.0.0.0/0".parse().unwrap());
        assert_eq!(protocol, Protocol::Direct);
    }

    #[test]
    fn parse_blackhole_route() {
        let mut msg = route_msg_template();
        msg.header.kind = RouteType::BlackHole;
        msg.header.destination_prefix_length = 32;
        msg.attributes.push(RouteAttribute::Destination(
            RouteAddress::Inet("203.0.113.1".parse().unwrap()),
        ));

        let (_, _, _, nexthops) = parse_route_msg(&msg).unwrap();
        assert_eq!(
            nexthops,
            [Nexthop::Special(NexthopSpecial::Blackhole)].into()
        );
    }

    #[test]
    fn parse_ignored_routes() {
        // Local routes live outside of the main table.
        let mut msg = route_msg_template();
        msg.header.table = 255;
        msg.header.kind = RouteType::Local;
        assert!(parse_route_msg(&msg).is_none());

        // Multicast routes in the main table are not tracked either.
        let mut msg = route_msg_template();
        msg.header.kind = RouteType::Multicast;
        assert!(parse_route_msg(&msg).is_none());
    }
}
