//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::borrow::Cow;
use std::net::IpAddr;
use std::sync::LazyLock as Lazy;

use derive_new::new;
use enum_as_inner::EnumAsInner;
use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use netsync_northbound::state::{
    Callbacks, CallbacksBuilder, ListEntryKind, Provider,
};
use netsync_northbound::yang::routing::control_plane_protocols::control_plane_protocol;
use netsync_northbound::yang::routing::ribs;
use netsync_utils::ip::AddressFamily;
use netsync_utils::southbound::Nexthop;
use netsync_yang::ToYang;

use crate::rib::{Route, RouteFlags, StaticRoute};
use crate::{Instance, InstanceId, Master};

pub static CALLBACKS: Lazy<Callbacks<Master>> = Lazy::new(load_callbacks);

#[derive(Debug, Default)]
#[derive(EnumAsInner)]
pub enum ListEntry<'a> {
    #[default]
    None,
    ProtocolInstance(&'a InstanceId, &'a Instance),
    StaticRoute(RouteDestination<'a>, &'a StaticRoute),
    Rib(RibAddressFamily),
    Route(RouteDestination<'a>, &'a Route),
}

#[derive(Debug)]
pub enum RibAddressFamily {
    Ipv4,
    Ipv6,
}

#[derive(Debug)]
#[derive(EnumAsInner, new)]
pub enum RouteDestination<'a> {
    Ipv4(&'a Ipv4Network),
    Ipv6(&'a Ipv6Network),
}

// ===== callbacks =====

fn load_callbacks() -> Callbacks<Master> {
    CallbacksBuilder::<Master>::default()
        .path(control_plane_protocol::PATH)
        .get_iterate(|master, _args| {
            let iter = master
                .instances
                .iter()
                .map(|(instance_id, instance)| {
                    ListEntry::ProtocolInstance(instance_id, instance)
                });
            Some(Box::new(iter))
        })
        .get_object(|_master, args| {
            use control_plane_protocol::ControlPlaneProtocol;
            let (instance_id, instance) =
                args.list_entry.as_protocol_instance().unwrap();
            Box::new(ControlPlaneProtocol {
                r#type: instance_id.protocol.to_yang(),
                name: instance_id.name.as_str().into(),
                description: instance
                    .description
                    .as_deref()
                    .map(Cow::Borrowed),
            })
        })
        .path(control_plane_protocol::static_routes::ipv4::route::PATH)
        .get_iterate(|_master, args| {
            let (_, instance) =
                args.parent_list_entry.as_protocol_instance().unwrap();
            let iter = instance.static_routes.iter().filter_map(
                |(prefix, route)| match prefix {
                    IpNetwork::V4(prefix) => {
                        let dest = RouteDestination::new_ipv4(prefix);
                        Some(ListEntry::StaticRoute(dest, route))
                    }
                    IpNetwork::V6(_) => None,
                },
            );
            Some(Box::new(iter))
        })
        .get_object(|_master, args| {
            use control_plane_protocol::static_routes::ipv4::route::Route;
            let (dest, route) = args.list_entry.as_static_route().unwrap();
            let prefix = dest.as_ipv4().copied().unwrap();
            Box::new(Route {
                destination_prefix: Cow::Borrowed(prefix),
                description: route.description.as_deref().map(Cow::Borrowed),
            })
        })
        .path(
            control_plane_protocol::static_routes::ipv4::route::next_hop::PATH,
        )
        .get_object(|_master, args| {
            use control_plane_protocol::static_routes::ipv4::route::next_hop::NextHop;
            let (_, route) = args.list_entry.as_static_route().unwrap();
            let next_hop_address = match &route.nexthop.addr {
                Some(IpAddr::V4(addr)) => Some(Cow::Borrowed(addr)),
                _ => None,
            };
            Box::new(NextHop {
                outgoing_interface: route
                    .nexthop
                    .ifname
                    .as_deref()
                    .map(Cow::Borrowed),
                next_hop_address,
                special_next_hop: route
                    .nexthop
                    .special
                    .map(|special| special.to_yang()),
            })
        })
        .path(control_plane_protocol::static_routes::ipv6::route::PATH)
        .get_iterate(|_master, args| {
            let (_, instance) =
                args.parent_list_entry.as_protocol_instance().unwrap();
            let iter = instance.static_routes.iter().filter_map(
                |(prefix, route)| match prefix {
                    IpNetwork::V6(prefix) => {
                        let dest = RouteDestination::new_ipv6(prefix);
                        Some(ListEntry::StaticRoute(dest, route))
                    }
                    IpNetwork::V4(_) => None,
                },
            );
            Some(Box::new(iter))
        })
        .get_object(|_master, args| {
            use control_plane_protocol::static_routes::ipv6::route::Route;
            let (dest, route) = args.list_entry.as_static_route().unwrap();
            let prefix = dest.as_ipv6().copied().unwrap();
            Box::new(Route {
                destination_prefix: Cow::Borrowed(prefix),
                description: route.description.as_deref().map(Cow::Borrowed),
            })
        })
        .path(
            control_plane_protocol::static_routes::ipv6::route::next_hop::PATH,
        )
        .get_object(|_master, args| {
            use control_plane_protocol::static_routes::ipv6::route::next_hop::NextHop;
            let (_, route) = args.list_entry.as_static_route().unwrap();
            let next_hop_address = match &route.nexthop.addr {
                Some(IpAddr::V6(addr)) => Some(Cow::Borrowed(addr)),
                _ => None,
            };
            Box::new(NextHop {
                outgoing_interface: route
                    .nexthop
                    .ifname
                    .as_deref()
                    .map(Cow::Borrowed),
                next_hop_address,
                special_next_hop: route
                    .nexthop
                    .special
                    .map(|special| special.to_yang()),
            })
        })
        .path(ribs::rib::PATH)
        .get_iterate(|_master, _args| {
            let iter = [RibAddressFamily::Ipv4, RibAddressFamily::Ipv6]
                .into_iter()
                .map(ListEntry::Rib);
            Some(Box::new(iter))
        })
        .get_object(|_master, args| {
            use ribs::rib::Rib;
            let rib = args.list_entry.as_rib().unwrap();
            let (name, af) = match rib {
                RibAddressFamily::Ipv4 => ("ipv4", AddressFamily::Ipv4),
                RibAddressFamily::Ipv6 => ("ipv6", AddressFamily::Ipv6),
            };
            Box::new(Rib {
                name: name.into(),
                address_family: Some(af.to_yang()),
            })
        })
        .path(ribs::rib::routes::route::PATH)
        .get_iterate(|master, args| {
            let af = args.parent_list_entry.as_rib().unwrap();
            match af {
                RibAddressFamily::Ipv4 => {
                    let iter =
                        master.rib.ipv4.iter().flat_map(|(dest, routes)| {
                            routes
                                .values()
                                .filter(|route| {
                                    !route
                                        .flags
                                        .contains(RouteFlags::REMOVED)
                                })
                                .map(|route| {
                                    let dest =
                                        RouteDestination::new_ipv4(dest);
                                    ListEntry::Route(dest, route)
                                })
                        });
                    Some(Box::new(iter))
                }
                RibAddressFamily::Ipv6 => {
                    let iter =
                        master.rib.ipv6.iter().flat_map(|(dest, routes)| {
                            routes
                                .values()
                                .filter(|route| {
                                    !route
                                        .flags
                                        .contains(RouteFlags::REMOVED)
                                })
                                .map(|route| {
                                    let dest =
                                        RouteDestination::new_ipv6(dest);
                                    ListEntry::Route(dest, route)
                                })
                        });
                    Some(Box::new(iter))
                }
            }
        })
        .get_object(|_master, args| {
            use ribs::rib::routes::route::Route;
            let (dest, route) = args.list_entry.as_route().unwrap();
            Box::new(Route {
                route_preference: Some(route.distance),
                source_protocol: Some(route.protocol.to_yang()),
                active: route
                    .flags
                    .contains(RouteFlags::ACTIVE)
                    .then_some(()),
                last_updated: Some(Cow::Borrowed(&route.last_updated)),
                ipv4_destination_prefix: dest
                    .as_ipv4()
                    .copied()
                    .map(Cow::Borrowed),
                ipv6_destination_prefix: dest
                    .as_ipv6()
                    .copied()
                    .map(Cow::Borrowed),
            })
        })
        .path(ribs::rib::routes::route::next_hop::PATH)
        .get_object(|master, args| {
            use ribs::rib::routes::route::next_hop::NextHop;
            let (_, route) = args.list_entry.as_route().unwrap();
            let mut outgoing_interface = None;
            let mut ipv4_next_hop_address = None;
            let mut ipv6_next_hop_address = None;
            let mut special_next_hop = None;
            // Multipath routes aren't representable in the simple next-hop
            // form.
            if route.nexthops.len() == 1 {
                let nexthop = route.nexthops.first().unwrap();
                match nexthop {
                    Nexthop::Address { ifindex, addr } => {
                        outgoing_interface =
                            ifname_by_ifindex(master, *ifindex);
                        match addr {
                            IpAddr::V4(addr) => {
                                ipv4_next_hop_address =
                                    Some(Cow::Borrowed(addr));
                            }
                            IpAddr::V6(addr) => {
                                ipv6_next_hop_address =
                                    Some(Cow::Borrowed(addr));
                            }
                        }
                    }
                    Nexthop::Interface { ifindex } => {
                        outgoing_interface =
                            ifname_by_ifindex(master, *ifindex);
                    }
                    Nexthop::Special(nexthop) => {
                        special_next_hop = Some(nexthop.to_yang());
                    }
                }
            }
            Box::new(NextHop {
                outgoing_interface,
                ipv4_next_hop_address,
                ipv6_next_hop_address,
                special_next_hop,
            })
        })
        .build()
}

// ===== helper functions =====

fn ifname_by_ifindex(master: &Master, ifindex: u32) -> Option<Cow<'_, str>> {
    master
        .interfaces
        .values()
        .find(|iface| iface.ifindex == ifindex)
        .map(|iface| Cow::Borrowed(iface.ifname.as_str()))
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
