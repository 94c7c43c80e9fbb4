//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use crate::interface::OperStatus;

// ===== global functions =====

// Returns the operational status of an interface as reported by sysfs.
pub(crate) fn oper_status(ifname: &str) -> OperStatus {
    let path = format!("/sys/class/net/{ifname}/operstate");
    match std::fs::read_to_string(path) {
        Ok(value) => parse_oper_status(value.trim()),
        Err(_) => OperStatus::Unknown,
    }
}

// Parses an RFC 2863 operational status string as used by the kernel.
fn parse_oper_status(value: &str) -> OperStatus {
    match value {
        "up" => OperStatus::Up,
        "down" => OperStatus::Down,
        "testing" => OperStatus::Testing,
        "dormant" => OperStatus::Dormant,
        "notpresent" => OperStatus::NotPresent,
        "lowerlayerdown" => OperStatus::LowerLayerDown,
        _ => OperStatus::Unknown,
    }
}

// ===== tests =====

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oper_status_strings() {
        assert_eq!(parse_oper_status("up"), OperStatus::Up);
        assert_eq!(parse_oper_status("down"), OperStatus::Down);
        assert_eq!(parse_oper_status("lowerlayerdown"), OperStatus::LowerLayerDown);
        assert_eq!(parse_oper_status("notpresent"), OperStatus::NotPresent);
        assert_eq!(parse_oper_status("unknown"), OperStatus::Unknown);
        assert_eq!(parse_oper_status(""), OperStatus::Unknown);
    }
}
