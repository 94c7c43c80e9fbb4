//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::{BTreeMap, BTreeSet, btree_map};
use std::net::IpAddr;

use bitflags::bitflags;
use chrono::{DateTime, Utc};
use derive_new::new;
use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use netsync_utils::protocol::Protocol;
use netsync_utils::southbound::{Nexthop, NexthopSpecial};
use netsync_utils::{UnboundedReceiver, UnboundedSender};
use prefix_trie::map::PrefixMap;
use tokio::sync::mpsc;

// Administrative distances used for routes learned from the kernel.
pub const DISTANCE_DIRECT: u32 = 0;
pub const DISTANCE_STATIC: u32 = 1;

#[derive(Debug)]
pub struct Rib {
    pub ipv4: PrefixMap<Ipv4Network, BTreeMap<u32, Route>>,
    pub ipv6: PrefixMap<Ipv6Network, BTreeMap<u32, Route>>,
    pub update_queue: BTreeSet<IpNetwork>,
    pub update_queue_tx: UnboundedSender<()>,
    pub update_queue_rx: UnboundedReceiver<()>,
}

#[derive(Clone, Debug, new)]
pub struct Route {
    pub protocol: Protocol,
    pub distance: u32,
    pub metric: u32,
    pub nexthops: BTreeSet<Nexthop>,
    pub last_updated: DateTime<Utc>,
    pub flags: RouteFlags,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct RouteFlags: u8 {
        const ACTIVE = 0x01;
        const REMOVED = 0x02;
    }
}

// Static route configuration data.
#[derive(Debug, Default)]
pub struct StaticRoute {
    pub nexthop: StaticRouteNexthop,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct StaticRouteNexthop {
    pub ifname: Option<String>,
    pub addr: Option<IpAddr>,
    pub special: Option<NexthopSpecial>,
}

// ===== impl Rib =====

impl Rib {
    // Adds or updates a route in the RIB.
    pub(crate) fn route_add(
        &mut self,
        prefix: IpNetwork,
        protocol: Protocol,
        distance: u32,
        metric: u32,
        nexthops: BTreeSet<Nexthop>,
    ) {
        let rib_prefix = self.prefix_entry(prefix);
        match rib_prefix.entry(distance) {
            btree_map::Entry::Vacant(v) => {
                // If the route does not exist, create a new entry.
                v.insert(Route::new(
                    protocol,
                    distance,
                    metric,
                    nexthops,
                    Utc::now(),
                    RouteFlags::empty(),
                ));
            }
            btree_map::Entry::Occupied(o) => {
                let route = o.into_mut();

                // Update the existing route with the new information.
                route.protocol = protocol;
                route.metric = metric;
                route.nexthops = nexthops;
                route.last_updated = Utc::now();
                route.flags.remove(RouteFlags::REMOVED);
            }
        }

        // Add route to the update queue.
        self.update_queue_add(prefix);
    }

    // Removes a route from the RIB.
    pub(crate) fn route_del(&mut self, prefix: IpNetwork, protocol: Protocol) {
        let rib_prefix = self.prefix_entry(prefix);

        // Find route entry from the same advertising protocol.
        if let Some(route) = rib_prefix
            .values_mut()
            .find(|route| route.protocol == protocol)
        {
            // Mark route as removed.
            route.flags.insert(RouteFlags::REMOVED);

            // Add route to the update queue.
            self.update_queue_add(prefix);
        }
    }

    // Processes routes present in the update queue.
    //
    // Routes marked for removal are deleted and the preferred route of each
    // prefix is recomputed. The kernel is never touched from here since the
    // RIB tracks what the kernel already has.
    pub(crate) fn process_update_queue(&mut self) {
        while let Some(prefix) = self.update_queue.pop_first() {
            let rib_prefix = self.prefix_entry(prefix);

            // Remove routes marked with the REMOVED flag.
            rib_prefix
                .retain(|_, route| !route.flags.contains(RouteFlags::REMOVED));

            // Select the best route for this prefix.
            for (idx, route) in rib_prefix.values_mut().enumerate() {
                if idx == 0 {
                    // Mark the route as the preferred one.
                    route.flags.insert(RouteFlags::ACTIVE);
                } else {
                    // Remove the preferred flag for other routes.
                    route.flags.remove(RouteFlags::ACTIVE);
                }
            }

            // Check if there are no routes left for this prefix.
            if rib_prefix.is_empty() {
                // Remove prefix entry from the RIB.
                match prefix {
                    IpNetwork::V4(prefix) => {
                        self.ipv4.remove(&prefix);
                    }
                    IpNetwork::V6(prefix) => {
                        self.ipv6.remove(&prefix);
                    }
                }
            }
        }
    }

    // Returns RIB entry associated to the given IP prefix.
    fn prefix_entry(&mut self, prefix: IpNetwork) -> &mut BTreeMap<u32, Route> {
        match prefix {
            IpNetwork::V4(prefix) => self.ipv4.entry(prefix).or_default(),
            IpNetwork::V6(prefix) => self.ipv6.entry(prefix).or_default(),
        }
    }

    // Adds route to the update queue.
    fn update_queue_add(&mut self, prefix: IpNetwork) {
        self.update_queue.insert(prefix);
        let _ = self.update_queue_tx.send(());
    }
}

impl Default for Rib {
    fn default() -> Self {
        let (update_queue_tx, update_queue_rx) = mpsc::unbounded_channel();
        Self {
            ipv4: Default::default(),
            ipv6: Default::default(),
            update_queue: Default::default(),
            update_queue_tx,
            update_queue_rx,
        }
    }
}

// ===== impl StaticRouteNexthop =====

impl StaticRouteNexthop {
    // Resolves the configured nexthop to its forwarding representation.
    //
    // The outgoing interface is resolved to its ifindex using the provided
    // map. A nexthop whose interface is not known to the kernel yet resolves
    // to nothing and the route is installed without gateway information.
    pub(crate) fn resolve(
        &self,
        interfaces: &BTreeMap<String, crate::Interface>,
    ) -> BTreeSet<Nexthop> {
        let mut nexthops = BTreeSet::new();

        if let Some(special) = self.special {
            nexthops.insert(Nexthop::Special(special));
            return nexthops;
        }

        let ifindex = self
            .ifname
            .as_ref()
            .and_then(|ifname| interfaces.get(ifname))
            .map(|iface| iface.ifindex);
        match (self.addr, ifindex) {
            (Some(addr), Some(ifindex)) => {
                nexthops.insert(Nexthop::Address { ifindex, addr });
            }
            (Some(addr), None) => {
                // Gateway with no explicit interface. The kernel resolves the
                // output interface on its own.
                nexthops.insert(Nexthop::Address { ifindex: 0, addr });
            }
            (None, Some(ifindex)) => {
                nexthops.insert(Nexthop::Interface { ifindex });
            }
            (None, None) => (),
        }

        nexthops
    }
}

// ===== tests =====

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix(s: &str) -> IpNetwork {
        s.parse().unwrap()
    }

    fn nexthops(addr: &str) -> BTreeSet<Nexthop> {
        [Nexthop::Address {
            ifindex: 2,
            addr: addr.parse().unwrap(),
        }]
        .into()
    }

    #[test]
    fn route_selection() {
        let mut rib = Rib::default();
        let dest = prefix("10.0.0.0/24");

        // Install a static route and a directly connected route for the same
        // prefix. The connected route has the lowest distance and must be
        // preferred.
        rib.route_add(
            dest,
            Protocol::Static,
            DISTANCE_STATIC,
            0,
            nexthops("192.168.1.1"),
        );
        rib.route_add(
            dest,
            Protocol::Direct,
            DISTANCE_DIRECT,
            0,
            Default::default(),
        );
        rib.process_update_queue();

        let routes = rib.ipv4.get(&"10.0.0.0/24".parse().unwrap()).unwrap();
        assert_eq!(routes.len(), 2);
        let best = routes.values().next().unwrap();
        assert_eq!(best.protocol, Protocol::Direct);
        assert!(best.flags.contains(RouteFlags::ACTIVE));
        let other = routes.values().nth(1).unwrap();
        assert_eq!(other.protocol, Protocol::Static);
        assert!(!other.flags.contains(RouteFlags::ACTIVE));

        // Remove the connected route and recompute. The static route must
        // take over.
        rib.route_del(dest, Protocol::Direct);
        rib.process_update_queue();
        let routes = rib.ipv4.get(&"10.0.0.0/24".parse().unwrap()).unwrap();
        assert_eq!(routes.len(), 1);
        let best = routes.values().next().unwrap();
        assert_eq!(best.protocol, Protocol::Static);
        assert!(best.flags.contains(RouteFlags::ACTIVE));
    }

    #[test]
    fn route_removal() {
        let mut rib = Rib::default();
        let dest = prefix("2001:db8::/64");

        rib.route_add(
            dest,
            Protocol::Static,
            DISTANCE_STATIC,
            0,
            nexthops("2001:db8:ffff::1"),
        );
        rib.process_update_queue();
        assert_eq!(rib.ipv6.iter().count(), 1);

        // Removing the only route must drop the whole prefix entry.
        rib.route_del(dest, Protocol::Static);
        rib.process_update_queue();
        assert_eq!(rib.ipv6.iter().count(), 0);
    }

    #[test]
    fn route_update_in_place() {
        let mut rib = Rib::default();
        let dest = prefix("10.0.1.0/24");

        rib.route_add(
            dest,
            Protocol::Static,
            DISTANCE_STATIC,
            0,
            nexthops("192.168.1.1"),
        );
        rib.route_del(dest, Protocol::Static);

        // Reinstalling before the queue is drained must clear the REMOVED
        // flag and replace the nexthops.
        rib.route_add(
            dest,
            Protocol::Static,
            DISTANCE_STATIC,
            0,
            nexthops("192.168.1.2"),
        );
        rib.process_update_queue();

        let routes = rib.ipv4.get(&"10.0.1.0/24".parse().unwrap()).unwrap();
        let route = routes.values().next().unwrap();
        assert!(route.flags.contains(RouteFlags::ACTIVE));
        assert_eq!(route.nexthops, nexthops("192.168.1.2"));
    }

    #[test]
    fn nexthop_resolution() {
        let mut interfaces = BTreeMap::new();
        interfaces.insert(
            "eth0".to_owned(),
            crate::Interface::new("eth0".to_owned(), 2, Default::default()),
        );

        // Gateway nexthop with a resolvable outgoing interface.
        let nexthop = StaticRouteNexthop {
            ifname: Some("eth0".to_owned()),
            addr: Some("10.0.2.1".parse().unwrap()),
            special: None,
        };
        assert_eq!(
            nexthop.resolve(&interfaces),
            [Nexthop::Address {
                ifindex: 2,
                addr: "10.0.2.1".parse().unwrap(),
            }]
            .into()
        );

        // Interface-only nexthop.
        let nexthop = StaticRouteNexthop {
            ifname: Some("eth0".to_owned()),
            addr: None,
            special: None,
        };
        assert_eq!(
            nexthop.resolve(&interfaces),
            [Nexthop::Interface { ifindex: 2 }].into()
        );

        // Special nexthop takes precedence.
        let nexthop = StaticRouteNexthop {
            ifname: None,
            addr: None,
            special: Some(NexthopSpecial::Blackhole),
        };
        assert_eq!(
            nexthop.resolve(&interfaces),
            [Nexthop::Special(NexthopSpecial::Blackhole)].into()
        );
    }
}
