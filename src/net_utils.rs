//! Local network helpers for discovery.
//!
//! Discovery queries go to the all-hosts group address, plus the
//! subnet-directed broadcast address of every local IPv4 interface so that
//! stations behind multicast-filtering switches still hear them.

use std::io;
use std::net::Ipv4Addr;

/// Subnet-directed broadcast addresses of all local IPv4 interfaces,
/// loopback excluded.
///
/// Returns an empty vec on platforms without interface enumeration;
/// callers then fall back to the group address alone.
pub(crate) fn broadcast_addresses() -> io::Result<Vec<Ipv4Addr>> {
    broadcast_addresses_impl()
}

/// Directed broadcast address of a subnet (`ip | !mask`).
fn directed_broadcast(ip: Ipv4Addr, netmask: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(ip) | !u32::from(netmask))
}

#[cfg(unix)]
fn broadcast_addresses_impl() -> io::Result<Vec<Ipv4Addr>> {
    let mut addresses = Vec::new();

    unsafe {
        let mut ifaddrs: *mut libc::ifaddrs = std::ptr::null_mut();
        if libc::getifaddrs(&mut ifaddrs) != 0 {
            return Err(io::Error::last_os_error());
        }

        let mut current = ifaddrs;
        while !current.is_null() {
            let entry = &*current;
            current = entry.ifa_next;

            if entry.ifa_addr.is_null() || entry.ifa_netmask.is_null() {
                continue;
            }
            if (*entry.ifa_addr).sa_family as i32 != libc::AF_INET {
                continue;
            }

            let ip = ipv4_of(entry.ifa_addr);
            if ip.is_loopback() {
                continue;
            }
            addresses.push(directed_broadcast(ip, ipv4_of(entry.ifa_netmask)));
        }

        libc::freeifaddrs(ifaddrs);
    }

    Ok(addresses)
}

#[cfg(unix)]
unsafe fn ipv4_of(addr: *const libc::sockaddr) -> Ipv4Addr {
    let addr = addr as *const libc::sockaddr_in;
    let octets = (*addr).sin_addr.s_addr.to_ne_bytes();
    Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3])
}

#[cfg(not(unix))]
fn broadcast_addresses_impl() -> io::Result<Vec<Ipv4Addr>> {
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directed_broadcast_slash_24() {
        assert_eq!(
            directed_broadcast(
                Ipv4Addr::new(192, 168, 1, 100),
                Ipv4Addr::new(255, 255, 255, 0)
            ),
            Ipv4Addr::new(192, 168, 1, 255)
        );
    }

    #[test]
    fn directed_broadcast_slash_16() {
        assert_eq!(
            directed_broadcast(Ipv4Addr::new(10, 0, 5, 42), Ipv4Addr::new(255, 255, 0, 0)),
            Ipv4Addr::new(10, 0, 255, 255)
        );
    }

    #[test]
    fn directed_broadcast_slash_30() {
        assert_eq!(
            directed_broadcast(
                Ipv4Addr::new(172, 16, 0, 1),
                Ipv4Addr::new(255, 255, 255, 252)
            ),
            Ipv4Addr::new(172, 16, 0, 3)
        );
    }
}
