//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::borrow::Cow;
use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::{DateTime, Utc};
use ipnetwork::{Ipv4Network, Ipv6Network};
use netsync_yang::{YANG_CTX, YangObject, YangPath};
use yang4::data::DataNodeRef;
use yang4::schema::SchemaModule;

pub mod interfaces {
    use super::*;

    pub const PATH: YangPath = YangPath::new("/ietf-interfaces:interfaces");

    pub mod interface {
        use super::*;

        pub const PATH: YangPath =
            YangPath::new("/ietf-interfaces:interfaces/interface");

        pub struct Interface<'a> {
            pub name: Cow<'a, str>,
            pub description: Option<Cow<'a, str>>,
            pub r#type: Option<Cow<'a, str>>,
            pub enabled: Option<bool>,
            pub if_index: Option<i32>,
            pub phys_address: Option<Cow<'a, str>>,
            pub oper_status: Option<Cow<'a, str>>,
        }

        impl YangObject for Interface<'_> {
            fn into_data_node(self: Box<Self>, dnode: &mut DataNodeRef<'_>) {
                let module: Option<&SchemaModule<'_>> = None;
                if let Some(description) = self.description {
                    dnode
                        .new_term(module, "description", Some(&description))
                        .unwrap();
                }
                if let Some(r#type) = self.r#type {
                    dnode.new_term(module, "type", Some(&r#type)).unwrap();
                }
                if let Some(enabled) = self.enabled {
                    dnode
                        .new_term(
                            module,
                            "enabled",
                            Some(&enabled.to_string()),
                        )
                        .unwrap();
                }
                if let Some(if_index) = self.if_index {
                    dnode
                        .new_term(
                            module,
                            "if-index",
                            Some(&if_index.to_string()),
                        )
                        .unwrap();
                }
                if let Some(phys_address) = self.phys_address {
                    dnode
                        .new_term(module, "phys-address", Some(&phys_address))
                        .unwrap();
                }
                if let Some(oper_status) = self.oper_status {
                    dnode
                        .new_term(module, "oper-status", Some(&oper_status))
                        .unwrap();
                }
            }

            fn list_keys(&self) -> String {
                format!("[name='{}']", self.name)
            }
        }

        pub mod name {
            use super::*;

            pub const PATH: YangPath =
                YangPath::new("/ietf-interfaces:interfaces/interface/name");
        }

        pub mod description {
            use super::*;

            pub const PATH: YangPath = YangPath::new(
                "/ietf-interfaces:interfaces/interface/description",
            );
        }

        pub mod r#type {
            use super::*;

            pub const PATH: YangPath =
                YangPath::new("/ietf-interfaces:interfaces/interface/type");
        }

        pub mod enabled {
            use super::*;

            pub const PATH: YangPath =
                YangPath::new("/ietf-interfaces:interfaces/interface/enabled");
            pub const DFLT: bool = true;
        }

        pub mod statistics {
            use super::*;

            pub const PATH: YangPath = YangPath::new(
                "/ietf-interfaces:interfaces/interface/statistics",
            );

            pub struct Statistics<'a> {
                pub discontinuity_time: Option<Cow<'a, DateTime<Utc>>>,
                pub in_octets: Option<u64>,
                pub in_unicast_pkts: Option<u64>,
                pub in_errors: Option<u32>,
                pub out_octets: Option<u64>,
                pub out_unicast_pkts: Option<u64>,
                pub out_errors: Option<u32>,
            }

            impl YangObject for Statistics<'_> {
                fn into_data_node(
                    self: Box<Self>,
                    dnode: &mut DataNodeRef<'_>,
                ) {
                    let module: Option<&SchemaModule<'_>> = None;
                    if let Some(discontinuity_time) = self.discontinuity_time {
                        dnode
                            .new_term(
                                module,
                                "discontinuity-time",
                                Some(&discontinuity_time.to_rfc3339()),
                            )
                            .unwrap();
                    }
                    if let Some(in_octets) = self.in_octets {
                        dnode
                            .new_term(
                                module,
                                "in-octets",
                                Some(&in_octets.to_string()),
                            )
                            .unwrap();
                    }
                    if let Some(in_unicast_pkts) = self.in_unicast_pkts {
                        dnode
                            .new_term(
                                module,
                                "in-unicast-pkts",
                                Some(&in_unicast_pkts.to_string()),
                            )
                            .unwrap();
                    }
                    if let Some(in_errors) = self.in_errors {
                        dnode
                            .new_term(
                                module,
                                "in-errors",
                                Some(&in_errors.to_string()),
                            )
                            .unwrap();
                    }
                    if let Some(out_octets) = self.out_octets {
                        dnode
                            .new_term(
                                module,
                                "out-octets",
                                Some(&out_octets.to_string()),
                            )
                            .unwrap();
                    }
                    if let Some(out_unicast_pkts) = self.out_unicast_pkts {
                        dnode
                            .new_term(
                                module,
                                "out-unicast-pkts",
                                Some(&out_unicast_pkts.to_string()),
                            )
                            .unwrap();
                    }
                    if let Some(out_errors) = self.out_errors {
                        dnode
                            .new_term(
                                module,
                                "out-errors",
                                Some(&out_errors.to_string()),
                            )
                            .unwrap();
                    }
                }
            }
        }

        pub mod ipv4 {
            use super::*;

            pub const PATH: YangPath = YangPath::new(
                "/ietf-interfaces:interfaces/interface/ietf-ip:ipv4",
            );

            pub struct Ipv4 {
                pub forwarding: Option<bool>,
                pub mtu: Option<u16>,
            }

            impl YangObject for Ipv4 {
                fn into_data_node(
                    self: Box<Self>,
                    dnode: &mut DataNodeRef<'_>,
                ) {
                    let module: Option<&SchemaModule<'_>> = None;
                    if let Some(forwarding) = self.forwarding {
                        dnode
                            .new_term(
                                module,
                                "forwarding",
                                Some(&forwarding.to_string()),
                            )
                            .unwrap();
                    }
                    if let Some(mtu) = self.mtu {
                        dnode
                            .new_term(module, "mtu", Some(&mtu.to_string()))
                            .unwrap();
                    }
                }
            }

            pub mod forwarding {
                use super::*;

                pub const PATH: YangPath = YangPath::new(
                    "/ietf-interfaces:interfaces/interface/ietf-ip:ipv4/forwarding",
                );
                pub const DFLT: bool = false;
            }

            pub mod mtu {
                use super::*;

                pub const PATH: YangPath = YangPath::new(
                    "/ietf-interfaces:interfaces/interface/ietf-ip:ipv4/mtu",
                );
            }

            pub mod address {
                use super::*;

                pub const PATH: YangPath = YangPath::new(
                    "/ietf-interfaces:interfaces/interface/ietf-ip:ipv4/address",
                );

                pub struct Address<'a> {
                    pub ip: Cow<'a, Ipv4Addr>,
                    pub prefix_length: Option<u8>,
                }

                impl YangObject for Address<'_> {
                    fn into_data_node(
                        self: Box<Self>,
                        dnode: &mut DataNodeRef<'_>,
                    ) {
                        let module: Option<&SchemaModule<'_>> = None;
                        if let Some(prefix_length) = self.prefix_length {
                            dnode
                                .new_term(
                                    module,
                                    "prefix-length",
                                    Some(&prefix_length.to_string()),
                                )
                                .unwrap();
                        }
                    }

                    fn list_keys(&self) -> String {
                        format!("[ip='{}']", self.ip)
                    }
                }

                pub mod ip {
                    use super::*;

                    pub const PATH: YangPath = YangPath::new(
                        "/ietf-interfaces:interfaces/interface/ietf-ip:ipv4/address/ip",
                    );
                }

                pub mod prefix_length {
                    use super::*;

                    pub const PATH: YangPath = YangPath::new(
                        "/ietf-interfaces:interfaces/interface/ietf-ip:ipv4/address/prefix-length",
                    );
                }

                pub mod netmask {
                    use super::*;

                    pub const PATH: YangPath = YangPath::new(
                        "/ietf-interfaces:interfaces/interface/ietf-ip:ipv4/address/netmask",
                    );
                }
            }

            pub mod neighbor {
                use super::*;

                pub const PATH: YangPath = YangPath::new(
                    "/ietf-interfaces:interfaces/interface/ietf-ip:ipv4/neighbor",
                );

                pub struct Neighbor<'a> {
                    pub ip: Cow<'a, Ipv4Addr>,
                    pub link_layer_address: Option<Cow<'a, str>>,
                }

                impl YangObject for Neighbor<'_> {
                    fn into_data_node(
                        self: Box<Self>,
                        dnode: &mut DataNodeRef<'_>,
                    ) {
                        let module: Option<&SchemaModule<'_>> = None;
                        if let Some(link_layer_address) =
                            self.link_layer_address
                        {
                            dnode
                                .new_term(
                                    module,
                                    "link-layer-address",
                                    Some(&link_layer_address),
                                )
                                .unwrap();
                        }
                    }

                    fn list_keys(&self) -> String {
                        format!("[ip='{}']", self.ip)
                    }
                }

                pub mod ip {
                    use super::*;

                    pub const PATH: YangPath = YangPath::new(
                        "/ietf-interfaces:interfaces/interface/ietf-ip:ipv4/neighbor/ip",
                    );
                }

                pub mod link_layer_address {
                    use super::*;

                    pub const PATH: YangPath = YangPath::new(
                        "/ietf-interfaces:interfaces/interface/ietf-ip:ipv4/neighbor/link-layer-address",
                    );
                }
            }
        }

        pub mod ipv6 {
            use super::*;

            pub const PATH: YangPath = YangPath::new(
                "/ietf-interfaces:interfaces/interface/ietf-ip:ipv6",
            );

            pub struct Ipv6 {
                pub forwarding: Option<bool>,
                pub mtu: Option<u32>,
            }

            impl YangObject for Ipv6 {
                fn into_data_node(
                    self: Box<Self>,
                    dnode: &mut DataNodeRef<'_>,
                ) {
                    let module: Option<&SchemaModule<'_>> = None;
                    if let Some(forwarding) = self.forwarding {
                        dnode
                            .new_term(
                                module,
                                "forwarding",
                                Some(&forwarding.to_string()),
                            )
                            .unwrap();
                    }
                    if let Some(mtu) = self.mtu {
                        dnode
                            .new_term(module, "mtu", Some(&mtu.to_string()))
                            .unwrap();
                    }
                }
            }

            pub mod forwarding {
                use super::*;

                pub const PATH: YangPath = YangPath::new(
                    "/ietf-interfaces:interfaces/interface/ietf-ip:ipv6/forwarding",
                );
                pub const DFLT: bool = false;
            }

            pub mod mtu {
                use super::*;

                pub const PATH: YangPath = YangPath::new(
                    "/ietf-interfaces:interfaces/interface/ietf-ip:ipv6/mtu",
                );
            }

            pub mod address {
                use super::*;

                pub const PATH: YangPath = YangPath::new(
                    "/ietf-interfaces:interfaces/interface/ietf-ip:ipv6/address",
                );

                pub struct Address<'a> {
                    pub ip: Cow<'a, Ipv6Addr>,
                    pub prefix_length: Option<u8>,
                }

                impl YangObject for Address<'_> {
                    fn into_data_node(
                        self: Box<Self>,
                        dnode: &mut DataNodeRef<'_>,
                    ) {
                        let module: Option<&SchemaModule<'_>> = None;
                        if let Some(prefix_length) = self.prefix_length {
                            dnode
                                .new_term(
                                    module,
                                    "prefix-length",
                                    Some(&prefix_length.to_string()),
                                )
                                .unwrap();
                        }
                    }

                    fn list_keys(&self) -> String {
                        format!("[ip='{}']", self.ip)
                    }
                }

                pub mod ip {
                    use super::*;

                    pub const PATH: YangPath = YangPath::new(
                        "/ietf-interfaces:interfaces/interface/ietf-ip:ipv6/address/ip",
                    );
                }

                pub mod prefix_length {
                    use super::*;

                    pub const PATH: YangPath = YangPath::new(
                        "/ietf-interfaces:interfaces/interface/ietf-ip:ipv6/address/prefix-length",
                    );
                }
            }

            pub mod neighbor {
                use super::*;

                pub const PATH: YangPath = YangPath::new(
                    "/ietf-interfaces:interfaces/interface/ietf-ip:ipv6/neighbor",
                );

                pub struct Neighbor<'a> {
                    pub ip: Cow<'a, Ipv6Addr>,
                    pub link_layer_address: Option<Cow<'a, str>>,
                }

                impl YangObject for Neighbor<'_> {
                    fn into_data_node(
                        self: Box<Self>,
                        dnode: &mut DataNodeRef<'_>,
                    ) {
                        let module: Option<&SchemaModule<'_>> = None;
                        if let Some(link_layer_address) =
                            self.link_layer_address
                        {
                            dnode
                                .new_term(
                                    module,
                                    "link-layer-address",
                                    Some(&link_layer_address),
                                )
                                .unwrap();
                        }
                    }

                    fn list_keys(&self) -> String {
                        format!("[ip='{}']", self.ip)
                    }
                }

                pub mod ip {
                    use super::*;

                    pub const PATH: YangPath = YangPath::new(
                        "/ietf-interfaces:interfaces/interface/ietf-ip:ipv6/neighbor/ip",
                    );
                }

                pub mod link_layer_address {
                    use super::*;

                    pub const PATH: YangPath = YangPath::new(
                        "/ietf-interfaces:interfaces/interface/ietf-ip:ipv6/neighbor/link-layer-address",
                    );
                }
            }
        }
    }
}

pub mod routing {
    use super::*;

    pub const PATH: YangPath = YangPath::new("/ietf-routing:routing");

    pub mod control_plane_protocols {
        use super::*;

        pub const PATH: YangPath =
            YangPath::new("/ietf-routing:routing/control-plane-protocols");

        pub mod control_plane_protocol {
            use super::*;

            pub const PATH: YangPath = YangPath::new(
                "/ietf-routing:routing/control-plane-protocols/control-plane-protocol",
            );

            pub struct ControlPlaneProtocol<'a> {
                pub r#type: Cow<'a, str>,
                pub name: Cow<'a, str>,
                pub description: Option<Cow<'a, str>>,
            }

            impl YangObject for ControlPlaneProtocol<'_> {
                fn into_data_node(
                    self: Box<Self>,
                    dnode: &mut DataNodeRef<'_>,
                ) {
                    let module: Option<&SchemaModule<'_>> = None;
                    if let Some(description) = self.description {
                        dnode
                            .new_term(module, "description", Some(&description))
                            .unwrap();
                    }
                }

                fn list_keys(&self) -> String {
                    format!(
                        "[type='{}'][name='{}']",
                        self.r#type, self.name
                    )
                }
            }

            pub mod r#type {
                use super::*;

                pub const PATH: YangPath = YangPath::new(
                    "/ietf-routing:routing/control-plane-protocols/control-plane-protocol/type",
                );
            }

            pub mod name {
                use super::*;

                pub const PATH: YangPath = YangPath::new(
                    "/ietf-routing:routing/control-plane-protocols/control-plane-protocol/name",
                );
            }

            pub mod description {
                use super::*;

                pub const PATH: YangPath = YangPath::new(
                    "/ietf-routing:routing/control-plane-protocols/control-plane-protocol/description",
                );
            }

            pub mod static_routes {
                use super::*;

                pub const PATH: YangPath = YangPath::new(
                    "/ietf-routing:routing/control-plane-protocols/control-plane-protocol/static-routes",
                );

                pub mod ipv4 {
                    use super::*;

                    pub const PATH: YangPath = YangPath::new(
                        "/ietf-routing:routing/control-plane-protocols/control-plane-protocol/static-routes/ietf-ipv4-unicast-routing:ipv4",
                    );

                    pub mod route {
                        use super::*;

                        pub const PATH: YangPath = YangPath::new(
                            "/ietf-routing:routing/control-plane-protocols/control-plane-protocol/static-routes/ietf-ipv4-unicast-routing:ipv4/route",
                        );

                        pub struct Route<'a> {
                            pub destination_prefix: Cow<'a, Ipv4Network>,
                            pub description: Option<Cow<'a, str>>,
                        }

                        impl YangObject for Route<'_> {
                            fn into_data_node(
                                self: Box<Self>,
                                dnode: &mut DataNodeRef<'_>,
                            ) {
                                let module: Option<&SchemaModule<'_>> = None;
                                if let Some(description) = self.description {
                                    dnode
                                        .new_term(
                                            module,
                                            "description",
                                            Some(&description),
                                        )
                                        .unwrap();
                                }
                            }

                            fn list_keys(&self) -> String {
                                format!(
                                    "[destination-prefix='{}']",
                                    self.destination_prefix
                                )
                            }
                        }

                        pub mod destination_prefix {
                            use super::*;

                            pub const PATH: YangPath = YangPath::new(
                                "/ietf-routing:routing/control-plane-protocols/control-plane-protocol/static-routes/ietf-ipv4-unicast-routing:ipv4/route/destination-prefix",
                            );
                        }

                        pub mod description {
                            use super::*;

                            pub const PATH: YangPath = YangPath::new(
                                "/ietf-routing:routing/control-plane-protocols/control-plane-protocol/static-routes/ietf-ipv4-unicast-routing:ipv4/route/description",
                            );
                        }

                        pub mod next_hop {
                            use super::*;

                            pub const PATH: YangPath = YangPath::new(
                                "/ietf-routing:routing/control-plane-protocols/control-plane-protocol/static-routes/ietf-ipv4-unicast-routing:ipv4/route/next-hop",
                            );

                            pub struct NextHop<'a> {
                                pub outgoing_interface: Option<Cow<'a, str>>,
                                pub next_hop_address: Option<Cow<'a, Ipv4Addr>>,
                                pub special_next_hop: Option<Cow<'a, str>>,
                            }

                            impl YangObject for NextHop<'_> {
                                fn into_data_node(
                                    self: Box<Self>,
                                    dnode: &mut DataNodeRef<'_>,
                                ) {
                                    let module: Option<&SchemaModule<'_>> =
                                        None;
                                    if let Some(outgoing_interface) =
                                        self.outgoing_interface
                                    {
                                        dnode
                                            .new_term(
                                                module,
                                                "outgoing-interface",
                                                Some(&outgoing_interface),
                                            )
                                            .unwrap();
                                    }
                                    if let Some(next_hop_address) =
                                        self.next_hop_address
                                    {
                                        dnode
                                            .new_term(
                                                module,
                                                "next-hop-address",
                                                Some(
                                                    &next_hop_address
                                                        .to_string(),
                                                ),
                                            )
                                            .unwrap();
                                    }
                                    if let Some(special_next_hop) =
                                        self.special_next_hop
                                    {
                                        dnode
                                            .new_term(
                                                module,
                                                "special-next-hop",
                                                Some(&special_next_hop),
                                            )
                                            .unwrap();
                                    }
                                }
                            }

                            pub mod outgoing_interface {
                                use super::*;

                                pub const PATH: YangPath = YangPath::new(
                                    "/ietf-routing:routing/control-plane-protocols/control-plane-protocol/static-routes/ietf-ipv4-unicast-routing:ipv4/route/next-hop/outgoing-interface",
                                );
                            }

                            pub mod next_hop_address {
                                use super::*;

                                pub const PATH: YangPath = YangPath::new(
                                    "/ietf-routing:routing/control-plane-protocols/control-plane-protocol/static-routes/ietf-ipv4-unicast-routing:ipv4/route/next-hop/next-hop-address",
                                );
                            }

                            pub mod special_next_hop {
                                use super::*;

                                pub const PATH: YangPath = YangPath::new(
                                    "/ietf-routing:routing/control-plane-protocols/control-plane-protocol/static-routes/ietf-ipv4-unicast-routing:ipv4/route/next-hop/special-next-hop",
                                );
                            }
                        }
                    }
                }

                pub mod ipv6 {
                    use super::*;

                    pub const PATH: YangPath = YangPath::new(
                        "/ietf-routing:routing/control-plane-protocols/control-plane-protocol/static-routes/ietf-ipv6-unicast-routing:ipv6",
                    );

                    pub mod route {
                        use super::*;

                        pub const PATH: YangPath = YangPath::new(
                            "/ietf-routing:routing/control-plane-protocols/control-plane-protocol/static-routes/ietf-ipv6-unicast-routing:ipv6/route",
                        );

                        pub struct Route<'a> {
                            pub destination_prefix: Cow<'a, Ipv6Network>,
                            pub description: Option<Cow<'a, str>>,
                        }

                        impl YangObject for Route<'_> {
                            fn into_data_node(
                                self: Box<Self>,
                                dnode: &mut DataNodeRef<'_>,
                            ) {
                                let module: Option<&SchemaModule<'_>> = None;
                                if let Some(description) = self.description {
                                    dnode
                                        .new_term(
                                            module,
                                            "description",
                                            Some(&description),
                                        )
                                        .unwrap();
                                }
                            }

                            fn list_keys(&self) -> String {
                                format!(
                                    "[destination-prefix='{}']",
                                    self.destination_prefix
                                )
                            }
                        }

                        pub mod destination_prefix {
                            use super::*;

                            pub const PATH: YangPath = YangPath::new(
                                "/ietf-routing:routing/control-plane-protocols/control-plane-protocol/static-routes/ietf-ipv6-unicast-routing:ipv6/route/destination-prefix",
                            );
                        }

                        pub mod description {
                            use super::*;

                            pub const PATH: YangPath = YangPath::new(
                                "/ietf-routing:routing/control-plane-protocols/control-plane-protocol/static-routes/ietf-ipv6-unicast-routing:ipv6/route/description",
                            );
                        }

                        pub mod next_hop {
                            use super::*;

                            pub const PATH: YangPath = YangPath::new(
                                "/ietf-routing:routing/control-plane-protocols/control-plane-protocol/static-routes/ietf-ipv6-unicast-routing:ipv6/route/next-hop",
                            );

                            pub struct NextHop<'a> {
                                pub outgoing_interface: Option<Cow<'a, str>>,
                                pub next_hop_address: Option<Cow<'a, Ipv6Addr>>,
                                pub special_next_hop: Option<Cow<'a, str>>,
                            }

                            impl YangObject for NextHop<'_> {
                                fn into_data_node(
                                    self: Box<Self>,
                                    dnode: &mut DataNodeRef<'_>,
                                ) {
                                    let module: Option<&SchemaModule<'_>> =
                                        None;
                                    if let Some(outgoing_interface) =
                                        self.outgoing_interface
                                    {
                                        dnode
                                            .new_term(
                                                module,
                                                "outgoing-interface",
                                                Some(&outgoing_interface),
                                            )
                                            .unwrap();
                                    }
                                    if let Some(next_hop_address) =
                                        self.next_hop_address
                                    {
                                        dnode
                                            .new_term(
                                                module,
                                                "next-hop-address",
                                                Some(
                                                    &next_hop_address
                                                        .to_string(),
                                                ),
                                            )
                                            .unwrap();
                                    }
                                    if let Some(special_next_hop) =
                                        self.special_next_hop
                                    {
                                        dnode
                                            .new_term(
                                                module,
                                                "special-next-hop",
                                                Some(&special_next_hop),
                                            )
                                            .unwrap();
                                    }
                                }
                            }

                            pub mod outgoing_interface {
                                use super::*;

                                pub const PATH: YangPath = YangPath::new(
                                    "/ietf-routing:routing/control-plane-protocols/control-plane-protocol/static-routes/ietf-ipv6-unicast-routing:ipv6/route/next-hop/outgoing-interface",
                                );
                            }

                            pub mod next_hop_address {
                                use super::*;

                                pub const PATH: YangPath = YangPath::new(
                                    "/ietf-routing:routing/control-plane-protocols/control-plane-protocol/static-routes/ietf-ipv6-unicast-routing:ipv6/route/next-hop/next-hop-address",
                                );
                            }

                            pub mod special_next_hop {
                                use super::*;

                                pub const PATH: YangPath = YangPath::new(
                                    "/ietf-routing:routing/control-plane-protocols/control-plane-protocol/static-routes/ietf-ipv6-unicast-routing:ipv6/route/next-hop/special-next-hop",
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    pub mod ribs {
        use super::*;

        pub const PATH: YangPath = YangPath::new("/ietf-routing:routing/ribs");

        pub mod rib {
            use super::*;

            pub const PATH: YangPath =
                YangPath::new("/ietf-routing:routing/ribs/rib");

            pub struct Rib<'a> {
                pub name: Cow<'a, str>,
                pub address_family: Option<Cow<'a, str>>,
            }

            impl YangObject for Rib<'_> {
                fn into_data_node(
                    self: Box<Self>,
                    dnode: &mut DataNodeRef<'_>,
                ) {
                    let module: Option<&SchemaModule<'_>> = None;
                    if let Some(address_family) = self.address_family {
                        dnode
                            .new_term(
                                module,
                                "address-family",
                                Some(&address_family),
                            )
                            .unwrap();
                    }
                }

                fn list_keys(&self) -> String {
                    format!("[name='{}']", self.name)
                }
            }

            pub mod routes {
                use super::*;

                pub const PATH: YangPath =
                    YangPath::new("/ietf-routing:routing/ribs/rib/routes");

                pub mod route {
                    use super::*;

                    pub const PATH: YangPath = YangPath::new(
                        "/ietf-routing:routing/ribs/rib/routes/route",
                    );

                    pub struct Route<'a> {
                        pub route_preference: Option<u32>,
                        pub source_protocol: Option<Cow<'a, str>>,
                        pub active: Option<()>,
                        pub last_updated: Option<Cow<'a, DateTime<Utc>>>,
                        pub ipv4_destination_prefix:
                            Option<Cow<'a, Ipv4Network>>,
                        pub ipv6_destination_prefix:
                            Option<Cow<'a, Ipv6Network>>,
                    }

                    impl YangObject for Route<'_> {
                        fn into_data_node(
                            self: Box<Self>,
                            dnode: &mut DataNodeRef<'_>,
                        ) {
                            let module: Option<&SchemaModule<'_>> = None;
                            if let Some(route_preference) =
                                self.route_preference
                            {
                                dnode
                                    .new_term(
                                        module,
                                        "route-preference",
                                        Some(&route_preference.to_string()),
                                    )
                                    .unwrap();
                            }
                            if let Some(source_protocol) = self.source_protocol
                            {
                                dnode
                                    .new_term(
                                        module,
                                        "source-protocol",
                                        Some(&source_protocol),
                                    )
                                    .unwrap();
                            }
                            if self.active.is_some() {
                                dnode
                                    .new_term(module, "active", None)
                                    .unwrap();
                            }
                            if let Some(last_updated) = self.last_updated {
                                dnode
                                    .new_term(
                                        module,
                                        "last-updated",
                                        Some(&last_updated.to_rfc3339()),
                                    )
                                    .unwrap();
                            }
                            if let Some(ipv4_destination_prefix) =
                                self.ipv4_destination_prefix
                            {
                                let module = YANG_CTX
                                    .get()
                                    .unwrap()
                                    .get_module_latest(
                                        "ietf-ipv4-unicast-routing",
                                    )
                                    .unwrap();
                                let module = Some(&module);
                                dnode
                                    .new_term(
                                        module,
                                        "destination-prefix",
                                        Some(
                                            &ipv4_destination_prefix
                                                .to_string(),
                                        ),
                                    )
                                    .unwrap();
                            }
                            if let Some(ipv6_destination_prefix) =
                                self.ipv6_destination_prefix
                            {
                                let module = YANG_CTX
                                    .get()
                                    .unwrap()
                                    .get_module_latest(
                                        "ietf-ipv6-unicast-routing",
                                    )
                                    .unwrap();
                                let module = Some(&module);
                                dnode
                                    .new_term(
                                        module,
                                        "destination-prefix",
                                        Some(
                                            &ipv6_destination_prefix
                                                .to_string(),
                                        ),
                                    )
                                    .unwrap();
                            }
                        }
                    }

                    pub mod next_hop {
                        use super::*;

                        pub const PATH: YangPath = YangPath::new(
                            "/ietf-routing:routing/ribs/rib/routes/route/next-hop",
                        );

                        pub struct NextHop<'a> {
                            pub outgoing_interface: Option<Cow<'a, str>>,
                            pub special_next_hop: Option<Cow<'a, str>>,
                            pub ipv4_next_hop_address:
                                Option<Cow<'a, Ipv4Addr>>,
                            pub ipv6_next_hop_address:
                                Option<Cow<'a, Ipv6Addr>>,
                        }

                        impl YangObject for NextHop<'_> {
                            fn into_data_node(
                                self: Box<Self>,
                                dnode: &mut DataNodeRef<'_>,
                            ) {
                                let module: Option<&SchemaModule<'_>> = None;
                                if let Some(outgoing_interface) =
                                    self.outgoing_interface
                                {
                                    dnode
                                        .new_term(
                                            module,
                                            "outgoing-interface",
                                            Some(&outgoing_interface),
                                        )
                                        .unwrap();
                                }
                                if let Some(special_next_hop) =
                                    self.special_next_hop
                                {
                                    dnode
                                        .new_term(
                                            module,
                                            "special-next-hop",
                                            Some(&special_next_hop),
                                        )
                                        .unwrap();
                                }
                                if let Some(ipv4_next_hop_address) =
                                    self.ipv4_next_hop_address
                                {
                                    let module = YANG_CTX
                                        .get()
                                        .unwrap()
                                        .get_module_latest(
                                            "ietf-ipv4-unicast-routing",
                                        )
                                        .unwrap();
                                    let module = Some(&module);
                                    dnode
                                        .new_term(
                                            module,
                                            "next-hop-address",
                                            Some(
                                                &ipv4_next_hop_address
                                                    .to_string(),
                                            ),
                                        )
                                        .unwrap();
                                }
                                if let Some(ipv6_next_hop_address) =
                                    self.ipv6_next_hop_address
                                {
                                    let module = YANG_CTX
                                        .get()
                                        .unwrap()
                                        .get_module_latest(
                                            "ietf-ipv6-unicast-routing",
                                        )
                                        .unwrap();
                                    let module = Some(&module);
                                    dnode
                                        .new_term(
                                            module,
                                            "next-hop-address",
                                            Some(
                                                &ipv6_next_hop_address
                                                    .to_string(),
                                            ),
                                        )
                                        .unwrap();
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
