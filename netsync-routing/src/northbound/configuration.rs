//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::sync::LazyLock as Lazy;

use async_trait::async_trait;
use enum_as_inner::EnumAsInner;
use ipnetwork::IpNetwork;
use netsync_northbound::configuration::{
    Callbacks, CallbacksBuilder, Provider,
};
use netsync_northbound::error::Error;
use netsync_northbound::yang::routing::control_plane_protocols::control_plane_protocol;
use netsync_utils::protocol::Protocol;
use netsync_utils::southbound::NexthopSpecial;
use netsync_utils::yang::DataNodeRefExt;
use netsync_yang::TryFromYang;

use crate::rib::{DISTANCE_STATIC, StaticRoute};
use crate::{Instance, InstanceId, Master, netlink};

static CALLBACKS: Lazy<Callbacks<Master>> = Lazy::new(load_callbacks);

#[derive(Debug, Default, EnumAsInner)]
pub enum ListEntry {
    #[default]
    None,
    ProtocolInstance(InstanceId),
    StaticRoute(InstanceId, IpNetwork),
}

#[derive(Debug)]
pub enum Resource {}

// The variant order defines the processing order. Uninstalls come before
// installs so a prefix whose route is recreated within one transaction ends
// up with the new version.
#[derive(Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Event {
    StaticRouteUninstall(IpNetwork),
    StaticRouteInstall(IpNetwork),
}

// ===== callbacks =====

fn load_callbacks() -> Callbacks<Master> {
    CallbacksBuilder::<Master>::default()
        .path(control_plane_protocol::PATH)
        .create_prepare(|_master, args| {
            let ptype = args.dnode.get_string_relative("./type").unwrap();
            if Protocol::try_from_yang(&ptype).is_none() {
                return Err("unknown protocol name".to_owned());
            }
            Ok(())
        })
        .create_apply(|master, args| {
            let ptype = args.dnode.get_string_relative("./type").unwrap();
            let name = args.dnode.get_string_relative("./name").unwrap();
            let protocol = Protocol::try_from_yang(&ptype).unwrap();

            let instance_id = InstanceId::new(protocol, name);
            master.instances.insert(instance_id, Instance::default());
        })
        .delete_apply(|master, args| {
            let instance_id =
                args.list_entry.into_protocol_instance().unwrap();

            // Withdraw all routes owned by the instance.
            let instance = master.instances.remove(&instance_id).unwrap();
            let event_queue = args.event_queue;
            for prefix in instance.static_routes.into_keys() {
                event_queue.insert(Event::StaticRouteUninstall(prefix));
            }
        })
        .lookup(|_master, _list_entry, dnode| {
            let ptype = dnode.get_string_relative("./type").unwrap();
            let name = dnode.get_string_relative("./name").unwrap();
            let protocol = Protocol::try_from_yang(&ptype).unwrap();

            let instance_id = InstanceId::new(protocol, name);
            ListEntry::ProtocolInstance(instance_id)
        })
        .path(control_plane_protocol::description::PATH)
        .modify_apply(|master, args| {
            let instance_id =
                args.list_entry.into_protocol_instance().unwrap();
            let description = args.dnode.get_string();

            let instance = master.instances.get_mut(&instance_id).unwrap();
            instance.description = Some(description);
        })
        .delete_apply(|master, args| {
            let instance_id =
                args.list_entry.into_protocol_instance().unwrap();

            let instance = master.instances.get_mut(&instance_id).unwrap();
            instance.description = None;
        })
        .path(control_plane_protocol::static_routes::ipv4::route::PATH)
        .create_apply(|master, args| {
            let instance_id =
                args.list_entry.into_protocol_instance().unwrap();
            let prefix = args
                .dnode
                .get_prefix4_relative("./destination-prefix")
                .unwrap();
            let prefix = IpNetwork::V4(prefix);

            let instance = master.instances.get_mut(&instance_id).unwrap();
            instance.static_routes.insert(prefix, StaticRoute::default());

            let event_queue = args.event_queue;
            event_queue.insert(Event::StaticRouteInstall(prefix));
        })
        .delete_apply(|master, args| {
            let (instance_id, prefix) =
                args.list_entry.into_static_route().unwrap();

            let instance = master.instances.get_mut(&instance_id).unwrap();
            instance.static_routes.remove(&prefix);

            let event_queue = args.event_queue;
            event_queue.insert(Event::StaticRouteUninstall(prefix));
        })
        .lookup(|_master, list_entry, dnode| {
            let instance_id = list_entry.into_protocol_instance().unwrap();
            let prefix =
                dnode.get_prefix4_relative("./destination-prefix").unwrap();
            ListEntry::StaticRoute(instance_id, IpNetwork::V4(prefix))
        })
        .path(
            control_plane_protocol::static_routes::ipv4::route::description::PATH,
        )
        .modify_apply(|master, args| {
            let (instance_id, prefix) =
                args.list_entry.into_static_route().unwrap();
            let description = args.dnode.get_string();

            let instance = master.instances.get_mut(&instance_id).unwrap();
            let route = instance.static_routes.get_mut(&prefix).unwrap();
            route.description = Some(description);
        })
        .delete_apply(|master, args| {
            let (instance_id, prefix) =
                args.list_entry.into_static_route().unwrap();

            let instance = master.instances.get_mut(&instance_id).unwrap();
            let route = instance.static_routes.get_mut(&prefix).unwrap();
            route.description = None;
        })
        .path(
            control_plane_protocol::static_routes::ipv4::route::next_hop::outgoing_interface::PATH,
        )
        .modify_apply(|master, args| {
            let (instance_id, prefix) =
                args.list_entry.into_static_route().unwrap();
            let ifname = args.dnode.get_string();

            let instance = master.instances.get_mut(&instance_id).unwrap();
            let route = instance.static_routes.get_mut(&prefix).unwrap();
            route.nexthop.ifname = Some(ifname);

            let event_queue = args.event_queue;
            event_queue.insert(Event::StaticRouteInstall(prefix));
        })
        .delete_apply(|master, args| {
            let (instance_id, prefix) =
                args.list_entry.into_static_route().unwrap();

            let instance = master.instances.get_mut(&instance_id).unwrap();
            let route = instance.static_routes.get_mut(&prefix).unwrap();
            route.nexthop.ifname = None;

            let event_queue = args.event_queue;
            event_queue.insert(Event::StaticRouteInstall(prefix));
        })
        .path(
            control_plane_protocol::static_routes::ipv4::route::next_hop::next_hop_address::PATH,
        )
        .modify_apply(|master, args| {
            let (instance_id, prefix) =
                args.list_entry.into_static_route().unwrap();
            let addr = args.dnode.get_ip();

            let instance = master.instances.get_mut(&instance_id).unwrap();
            let route = instance.static_routes.get_mut(&prefix).unwrap();
            route.nexthop.addr = Some(addr);

            let event_queue = args.event_queue;
            event_queue.insert(Event::StaticRouteInstall(prefix));
        })
        .delete_apply(|master, args| {
            let (instance_id, prefix) =
                args.list_entry.into_static_route().unwrap();

            let instance = master.instances.get_mut(&instance_id).unwrap();
            let route = instance.static_routes.get_mut(&prefix).unwrap();
            route.nexthop.addr = None;

            let event_queue = args.event_queue;
            event_queue.insert(Event::StaticRouteInstall(prefix));
        })
        .path(
            control_plane_protocol::static_routes::ipv4::route::next_hop::special_next_hop::PATH,
        )
        .modify_apply(|master, args| {
            let (instance_id, prefix) =
                args.list_entry.into_static_route().unwrap();
            let special =
                NexthopSpecial::try_from_yang(&args.dnode.get_string())
                    .unwrap();

            let instance = master.instances.get_mut(&instance_id).unwrap();
            let route = instance.static_routes.get_mut(&prefix).unwrap();
            route.nexthop.special = Some(special);

            let event_queue = args.event_queue;
            event_queue.insert(Event::StaticRouteInstall(prefix));
        })
        .delete_apply(|master, args| {
            let (instance_id, prefix) =
                args.list_entry.into_static_route().unwrap();

            let instance = master.instances.get_mut(&instance_id).unwrap();
            let route = instance.static_routes.get_mut(&prefix).unwrap();
            route.nexthop.special = None;

            let event_queue = args.event_queue;
            event_queue.insert(Event::StaticRouteInstall(prefix));
        })
        .path(control_plane_protocol::static_routes::ipv6::route::PATH)
        .create_apply(|master, args| {
            let instance_id =
                args.list_entry.into_protocol_instance().unwrap();
            let prefix = args
                .dnode
                .get_prefix6_relative("./destination-prefix")
                .unwrap();
            let prefix = IpNetwork::V6(prefix);

            let instance = master.instances.get_mut(&instance_id).unwrap();
            instance.static_routes.insert(prefix, StaticRoute::default());

            let event_queue = args.event_queue;
            event_queue.insert(Event::StaticRouteInstall(prefix));
        })
        .delete_apply(|master, args| {
            let (instance_id, prefix) =
                args.list_entry.into_static_route().unwrap();

            let instance = master.instances.get_mut(&instance_id).unwrap();
            instance.static_routes.remove(&prefix);

            let event_queue = args.event_queue;
            event_queue.insert(Event::StaticRouteUninstall(prefix));
        })
        .lookup(|_master, list_entry, dnode| {
            let instance_id = list_entry.into_protocol_instance().unwrap();
            let prefix =
                dnode.get_prefix6_relative("./destination-prefix").unwrap();
            ListEntry::StaticRoute(instance_id, IpNetwork::V6(prefix))
        })
        .path(
            control_plane_protocol::static_routes::ipv6::route::description::PATH,
        )
        .modify_apply(|master, args| {
            let (instance_id, prefix) =
                args.list_entry.into_static_route().unwrap();
            let description = args.dnode.get_string();

            let instance = master.instances.get_mut(&instance_id).unwrap();
            let route = instance.static_routes.get_mut(&prefix).unwrap();
            route.description = Some(description);
        })
        .delete_apply(|master, args| {
            let (instance_id, prefix) =
                args.list_entry.into_static_route().unwrap();

            let instance = master.instances.get_mut(&instance_id).unwrap();
            let route = instance.static_routes.get_mut(&prefix).unwrap();
            route.description = None;
        })
        .path(
            control_plane_protocol::static_routes::ipv6::route::next_hop::outgoing_interface::PATH,
        )
        .modify_apply(|master, args| {
            let (instance_id, prefix) =
                args.list_entry.into_static_route().unwrap();
            let ifname = args.dnode.get_string();

            let instance = master.instances.get_mut(&instance_id).unwrap();
            let route = instance.static_routes.get_mut(&prefix).unwrap();
            route.nexthop.ifname = Some(ifname);

            let event_queue = args.event_queue;
            event_queue.insert(Event::StaticRouteInstall(prefix));
        })
        .delete_apply(|master, args| {
            let (instance_id, prefix) =
                args.list_entry.into_static_route().unwrap();

            let instance = master.instances.get_mut(&instance_id).unwrap();
            let route = instance.static_routes.get_mut(&prefix).unwrap();
            route.nexthop.ifname = None;

            let event_queue = args.event_queue;
            event_queue.insert(Event::StaticRouteInstall(prefix));
        })
        .path(
            control_plane_protocol::static_routes::ipv6::route::next_hop::next_hop_address::PATH,
        )
        .modify_apply(|master, args| {
            let (instance_id, prefix) =
                args.list_entry.into_static_route().unwrap();
            let addr = args.dnode.get_ip();

            let instance = master.instances.get_mut(&instance_id).unwrap();
            let route = instance.static_routes.get_mut(&prefix).unwrap();
            route.nexthop.addr = Some(addr);

            let event_queue = args.event_queue;
            event_queue.insert(Event::StaticRouteInstall(prefix));
        })
        .delete_apply(|master, args| {
            let (instance_id, prefix) =
                args.list_entry.into_static_route().unwrap();

            let instance = master.instances.get_mut(&instance_id).unwrap();
            let route = instance.static_routes.get_mut(&prefix).unwrap();
            route.nexthop.addr = None;

            let event_queue = args.event_queue;
            event_queue.insert(Event::StaticRouteInstall(prefix));
        })
        .path(
            control_plane_protocol::static_routes::ipv6::route::next_hop::special_next_hop::PATH,
        )
        .modify_apply(|master, args| {
            let (instance_id, prefix) =
                args.list_entry.into_static_route().unwrap();
            let special =
                NexthopSpecial::try_from_yang(&args.dnode.get_string())
                    .unwrap();

            let instance = master.instances.get_mut(&instance_id).unwrap();
            let route = instance.static_routes.get_mut(&prefix).unwrap();
            route.nexthop.special = Some(special);

            let event_queue = args.event_queue;
            event_queue.insert(Event::StaticRouteInstall(prefix));
        })
        .delete_apply(|master, args| {
            let (instance_id, prefix) =
                args.list_entry.into_static_route().unwrap();

            let instance = master.instances.get_mut(&instance_id).unwrap();
            let route = instance.static_routes.get_mut(&prefix).unwrap();
            route.nexthop.special = None;

            let event_queue = args.event_queue;
            event_queue.insert(Event::StaticRouteInstall(prefix));
        })
        .build()
}

// ===== impl Master =====

#[async_trait]
impl Provider for Master {
    type ListEntry = ListEntry;
    type Event = Event;
    type Resource = Resource;

    fn callbacks() -> Option<&'static Callbacks<Master>> {
        Some(&CALLBACKS)
    }

    async fn process_event(&mut self, event: Event) -> Result<(), Error> {
        match event {
            Event::StaticRouteUninstall(prefix) => {
                // Skip the removal while another instance still configures
                // the same prefix.
                if self.instances.values().any(|instance| {
                    instance.static_routes.contains_key(&prefix)
                }) {
                    return Ok(());
                }

                netlink::route_uninstall(
                    &self.netlink_handle,
                    &prefix,
                    Protocol::Static,
                )
                .await?;
                self.rib.route_del(prefix, Protocol::Static);
            }
            Event::StaticRouteInstall(prefix) => {
                let Some(route) = self
                    .instances
                    .values()
                    .find_map(|instance| instance.static_routes.get(&prefix))
                else {
                    return Ok(());
                };

                let nexthops = route.nexthop.resolve(&self.interfaces);
                netlink::route_install(
                    &self.netlink_handle,
                    &prefix,
                    &nexthops,
                    Protocol::Static,
                )
                .await?;
                self.rib.route_add(
                    prefix,
                    Protocol::Static,
                    DISTANCE_STATIC,
                    0,
                    nexthops,
                );
            }
        }

        Ok(())
    }
}
