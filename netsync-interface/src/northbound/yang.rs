//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::borrow::Cow;
use std::net::Ipv4Addr;

use netsync_yang::{ToYang, TryFromYang};

use crate::interface::{InterfaceType, OperStatus};

// ===== ToYang implementations =====

impl ToYang for InterfaceType {
    fn to_yang(&self) -> Cow<'static, str> {
        match self {
            InterfaceType::SoftwareLoopback => {
                "iana-if-type:softwareLoopback".into()
            }
            InterfaceType::EthernetCsmacd => {
                "iana-if-type:ethernetCsmacd".into()
            }
            InterfaceType::L2Vlan => "iana-if-type:l2vlan".into(),
            InterfaceType::Bridge => "iana-if-type:bridge".into(),
            InterfaceType::Other => "iana-if-type:other".into(),
        }
    }
}

impl ToYang for OperStatus {
    fn to_yang(&self) -> Cow<'static, str> {
        match self {
            OperStatus::Up => "up".into(),
            OperStatus::Down => "down".into(),
            OperStatus::Testing => "testing".into(),
            OperStatus::Unknown => "unknown".into(),
            OperStatus::Dormant => "dormant".into(),
            OperStatus::NotPresent => "not-present".into(),
            OperStatus::LowerLayerDown => "lower-layer-down".into(),
        }
    }
}

// ===== TryFromYang implementations =====

impl TryFromYang for InterfaceType {
    fn try_from_yang(value: &str) -> Option<InterfaceType> {
        match value {
            "iana-if-type:softwareLoopback" => {
                Some(InterfaceType::SoftwareLoopback)
            }
            "iana-if-type:ethernetCsmacd" => {
                Some(InterfaceType::EthernetCsmacd)
            }
            "iana-if-type:l2vlan" => Some(InterfaceType::L2Vlan),
            "iana-if-type:bridge" => Some(InterfaceType::Bridge),
            "iana-if-type:other" => Some(InterfaceType::Other),
            _ => None,
        }
    }
}

// ===== global functions =====

// Converts a dotted-quad netmask into a prefix length.
//
// Returns `None` if the mask bits aren't contiguous.
pub(crate) fn netmask_to_plen(netmask: Ipv4Addr) -> Option<u8> {
    let bits = netmask.to_bits();
    if bits.count_ones() != bits.leading_ones() {
        return None;
    }
    Some(bits.count_ones() as u8)
}

// ===== tests =====

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_type_mapping() {
        for (identity, iface_type) in [
            ("iana-if-type:softwareLoopback", InterfaceType::SoftwareLoopback),
            ("iana-if-type:ethernetCsmacd", InterfaceType::EthernetCsmacd),
            ("iana-if-type:l2vlan", InterfaceType::L2Vlan),
            ("iana-if-type:bridge", InterfaceType::Bridge),
            ("iana-if-type:other", InterfaceType::Other),
        ] {
            assert_eq!(InterfaceType::try_from_yang(identity), Some(iface_type));
            assert_eq!(iface_type.to_yang(), identity);
        }
        assert_eq!(InterfaceType::try_from_yang("iana-if-type:tunnel"), None);
        assert_eq!(
            InterfaceType::try_from_yang("iana-if-type:iana-interface-type"),
            None
        );
    }

    #[test]
    fn netmask_conversion() {
        assert_eq!(netmask_to_plen(Ipv4Addr::new(255, 0, 0, 0)), Some(8));
        assert_eq!(netmask_to_plen(Ipv4Addr::new(255, 255, 255, 0)), Some(24));
        assert_eq!(
            netmask_to_plen(Ipv4Addr::new(255, 255, 255, 255)),
            Some(32)
        );
        assert_eq!(netmask_to_plen(Ipv4Addr::new(0, 0, 0, 0)), Some(0));
        assert_eq!(netmask_to_plen(Ipv4Addr::new(255, 0, 255, 0)), None);
        assert_eq!(netmask_to_plen(Ipv4Addr::new(0, 255, 255, 255)), None);
    }
}
