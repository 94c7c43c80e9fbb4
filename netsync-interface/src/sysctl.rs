//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use netsync_utils::capabilities;
use netsync_utils::ip::AddressFamily;
use sysctl::{Ctl, Sysctl};
use tracing::error;

use crate::error::Error;

// ===== global functions =====

// Enables or disables packet forwarding on an interface.
pub(crate) fn forwarding_set(
    ifname: &str,
    af: AddressFamily,
    enable: bool,
) -> Result<(), Error> {
    let name = match af {
        AddressFamily::Ipv4 => format!("net.ipv4.conf.{ifname}.forwarding"),
        AddressFamily::Ipv6 => format!("net.ipv6.conf.{ifname}.forwarding"),
    };
    let enable = if enable { "1" } else { "0" };

    if let Err(error) = capabilities::raise(|| {
        let ctl = Ctl::new(&name)?;
        ctl.set_value_string(enable)?;
        Ok(())
    }) {
        error!(%ifname, %af, %error, "failed to configure forwarding");
        return Err(Error::Sysctl(error));
    }
    Ok(())
}

// Sets the IPv6 MTU of an interface.
//
// The kernel manages the IPv6 MTU separately from the link MTU.
pub(crate) fn mtu6_set(ifname: &str, mtu: u32) -> Result<(), Error> {
    let name = format!("net.ipv6.conf.{ifname}.mtu");

    if let Err(error) = capabilities::raise(|| {
        let ctl = Ctl::new(&name)?;
        ctl.set_value_string(&mtu.to_string())?;
        Ok(())
    }) {
        error!(%ifname, %mtu, %error, "failed to set IPv6 MTU");
        return Err(Error::Sysctl(error));
    }
    Ok(())
}
