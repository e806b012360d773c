//! Station discovery over UDP.
//!
//! Stations resolve each other's network addresses without any directory
//! service: a requester broadcasts the wire form of a resident identifier
//! to the discovery port, and the station owning that identifier answers
//! with a unicast text reply `"<address>?<device-type>*<description>"`.
//!
//! Each [`Discovery`] instance binds one UDP endpoint and runs one
//! responder thread. The responder is the only reader of the socket and
//! the only writer of the shared last-seen-address slot; requester calls
//! only write to the socket and wait on the slot.

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};
use socket2::{Domain, Protocol, SockAddr, Socket, Type};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::net_utils;
use crate::number::Number;

/// Well-known discovery port.
pub const DISCOVERY_PORT: u16 = 6789;

/// All-hosts group address queries are sent to.
pub const GROUP_ADDR: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 1);

/// Firmware banner advertised when no description is configured.
pub const DEFAULT_DESCRIPTION: &str = "AK01-FJV31001-V0.01-V11.38_20180410";

/// How often the responder re-checks the stop flag while idle.
const RECV_POLL: Duration = Duration::from_millis(500);

/// Station classes advertised in discovery replies.
///
/// The values are bit flags so a multi-role station can advertise a
/// combination; the combined value travels as a plain integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u32)]
pub enum DeviceType {
    /// Unclassified station.
    Unknown = 0,
    /// Basic indoor monitor.
    Basic = 1 << 0,
    /// Thin-client indoor monitor.
    ThinClient = 1 << 1,
    /// 3.5-inch door station.
    DoorStation35 = 1 << 2,
    /// 10-inch door station.
    DoorStation10 = 1 << 3,
    /// Management console.
    ManagementConsole = 1 << 4,
    /// 8-inch door station.
    DoorStation8 = 1 << 5,
    /// IP switch.
    IpSwitch = 1 << 6,
    /// 4-inch door station.
    DoorStation4 = 1 << 7,
    /// 16-inch door station.
    DoorStation16 = 1 << 8,
}

impl DeviceType {
    /// Numeric value exchanged in discovery replies.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Look up a station class by its advertised value.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => DeviceType::Basic,
            2 => DeviceType::ThinClient,
            4 => DeviceType::DoorStation35,
            8 => DeviceType::DoorStation10,
            16 => DeviceType::ManagementConsole,
            32 => DeviceType::DoorStation8,
            64 => DeviceType::IpSwitch,
            128 => DeviceType::DoorStation4,
            256 => DeviceType::DoorStation16,
            _ => DeviceType::Unknown,
        }
    }
}

/// Configuration for one [`Discovery`] instance.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Identifier this station answers for.
    pub number: Number,
    /// Address advertised in replies.
    pub addr: IpAddr,
    /// Station class advertised in replies.
    pub device_type: DeviceType,
    /// Free-form description appended to replies.
    pub description: String,
    /// UDP port to bind; queries target the same port on peers.
    pub port: u16,
}

impl DiscoveryConfig {
    /// Configuration with the conventional port, class and description.
    pub fn new(number: Number, addr: IpAddr) -> Self {
        Self {
            number,
            addr,
            device_type: DeviceType::Basic,
            description: DEFAULT_DESCRIPTION.to_string(),
            port: DISCOVERY_PORT,
        }
    }
}

/// State shared between the responder thread and requester calls.
struct Shared {
    stopped: AtomicBool,
    /// Last peer address heard; overwritten on every peer reply.
    last_addr: Mutex<Option<IpAddr>>,
    addr_seen: Condvar,
}

/// Answers identifier queries for this station and resolves peers.
///
/// Binds its endpoint and starts listening on construction; [`stop`]
/// (also run on drop) is terminal.
///
/// [`stop`]: Discovery::stop
pub struct Discovery {
    config: DiscoveryConfig,
    socket: UdpSocket,
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl Discovery {
    /// Bind the discovery endpoint and start the responder thread.
    pub fn new(config: DiscoveryConfig) -> io::Result<Self> {
        let socket = bind_discovery_socket(config.port)?;
        let responder = socket.try_clone()?;
        responder.set_read_timeout(Some(RECV_POLL))?;

        let shared = Arc::new(Shared {
            stopped: AtomicBool::new(false),
            last_addr: Mutex::new(None),
            addr_seen: Condvar::new(),
        });

        let own_query = config.number.encode();
        let reply = format!(
            "{}?{}*{}",
            config.addr,
            config.device_type.code(),
            config.description
        );
        let thread_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name("intercom-discovery".into())
            .spawn(move || responder_loop(responder, own_query, reply, thread_shared))?;

        Ok(Self {
            config,
            socket,
            shared,
            handle: Some(handle),
        })
    }

    /// The locally bound address (resolves port 0 to the actual port).
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// The reply payload this station sends for its own identifier.
    pub fn reply(&self) -> String {
        format!(
            "{}?{}*{}",
            self.config.addr,
            self.config.device_type.code(),
            self.config.description
        )
    }

    /// Resolve `number` to a network address.
    ///
    /// Broadcasts the identifier's wire form to the discovery group (and
    /// each interface's subnet-directed broadcast address), then waits up
    /// to `timeout` for any station to answer. Returns `Ok(None)` when no
    /// reply arrives in time.
    ///
    /// Only one `discover` call should be outstanding per instance:
    /// overlapping calls share the single last-seen-address slot and may
    /// observe each other's replies.
    pub fn discover(&self, number: &Number, timeout: Duration) -> io::Result<Option<IpAddr>> {
        let port = self.socket.local_addr()?.port();
        self.discover_via(number, timeout, |query, socket| {
            if let Ok(broadcasts) = net_utils::broadcast_addresses() {
                for addr in broadcasts {
                    let _ = socket.send_to(query, (addr, port));
                }
            }
            socket.send_to(query, (GROUP_ADDR, port)).map(|_| ())
        })
    }

    /// Resolve `number` by querying one specific endpoint.
    ///
    /// Useful for point-to-point setups and for tests on loopback, where
    /// broadcast does not apply.
    pub fn discover_at(
        &self,
        target: SocketAddr,
        number: &Number,
        timeout: Duration,
    ) -> io::Result<Option<IpAddr>> {
        self.discover_via(number, timeout, |query, socket| {
            socket.send_to(query, target).map(|_| ())
        })
    }

    /// Clear the slot, send the query, wait for the responder's signal.
    ///
    /// The slot lock is held from before the send until the wait suspends,
    /// so a reply landing in between cannot be lost.
    fn discover_via(
        &self,
        number: &Number,
        timeout: Duration,
        send: impl FnOnce(&[u8], &UdpSocket) -> io::Result<()>,
    ) -> io::Result<Option<IpAddr>> {
        let query = number.encode();
        let mut slot = self
            .shared
            .last_addr
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = None;
        send(&query, &self.socket)?;
        let (slot, _) = self
            .shared
            .addr_seen
            .wait_timeout_while(slot, timeout, |addr| addr.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        Ok(*slot)
    }

    /// Stop the responder thread and release the endpoint.
    pub fn stop(&mut self) {
        self.shared.stopped.store(true, Ordering::SeqCst);
        // Nudge the blocking receive so the loop sees the flag right away.
        if let Ok(addr) = self.socket.local_addr() {
            let target = SocketAddr::from((Ipv4Addr::LOCALHOST, addr.port()));
            let _ = self.socket.send_to(&[], target);
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Discovery {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Reuse-address broadcast socket bound to all interfaces.
fn bind_discovery_socket(port: u16) -> io::Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.set_broadcast(true)?;
    let bind_addr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port);
    socket.bind(&SockAddr::from(bind_addr))?;
    Ok(socket.into())
}

fn responder_loop(socket: UdpSocket, own_query: [u8; 5], reply: String, shared: Arc<Shared>) {
    let mut buf = [0u8; 1500];
    while !shared.stopped.load(Ordering::SeqCst) {
        let (len, peer) = match socket.recv_from(&mut buf) {
            Ok(received) => received,
            Err(err)
                if err.kind() == io::ErrorKind::WouldBlock
                    || err.kind() == io::ErrorKind::TimedOut =>
            {
                continue;
            }
            Err(err) => {
                if !shared.stopped.load(Ordering::SeqCst) {
                    warn!("discovery receive failed: {}", err);
                }
                break;
            }
        };
        if len == 0 {
            continue;
        }

        let data = &buf[..len];
        if data == &own_query[..] {
            debug!("answering identifier query from {}", peer);
            if let Err(err) = socket.send_to(reply.as_bytes(), peer) {
                warn!("failed to answer query from {}: {}", peer, err);
            }
            continue;
        }

        match parse_peer_reply(data) {
            Some(addr) => {
                let mut slot = shared
                    .last_addr
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                *slot = Some(addr);
                shared.addr_seen.notify_one();
            }
            // Queries for other stations and malformed datagrams are
            // dropped; the loop never gives up on bad input.
            None => debug!("ignoring {} byte datagram from {}", len, peer),
        }
    }
}

/// Extract the address prefix of a peer reply (`"<addr>?<type>*<desc>"`).
fn parse_peer_reply(data: &[u8]) -> Option<IpAddr> {
    let text = std::str::from_utf8(data).ok()?;
    let (addr, _) = text.split_once('?')?;
    addr.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_type_codes_round_trip() {
        for device_type in [
            DeviceType::Basic,
            DeviceType::ThinClient,
            DeviceType::DoorStation35,
            DeviceType::DoorStation10,
            DeviceType::ManagementConsole,
            DeviceType::DoorStation8,
            DeviceType::IpSwitch,
            DeviceType::DoorStation4,
            DeviceType::DoorStation16,
        ] {
            assert_eq!(DeviceType::from_code(device_type.code()), device_type);
        }
        assert_eq!(DeviceType::from_code(0), DeviceType::Unknown);
        assert_eq!(DeviceType::from_code(3), DeviceType::Unknown);
    }

    #[test]
    fn parses_peer_replies() {
        assert_eq!(
            parse_peer_reply(b"192.168.1.20?1*AK01"),
            Some(IpAddr::from([192, 168, 1, 20]))
        );
        // No separator, not an address, or not text at all.
        assert_eq!(parse_peer_reply(b"192.168.1.20"), None);
        assert_eq!(parse_peer_reply(b"doorway?1*x"), None);
        assert_eq!(parse_peer_reply(&[0xFF, 0x01, 0x01, 0x01, 0x00]), None);
    }

    #[test]
    fn reply_payload_format() {
        let mut config = DiscoveryConfig::new(
            Number::new(1, 101, None).unwrap(),
            IpAddr::from([10, 0, 0, 7]),
        );
        config.device_type = DeviceType::DoorStation4;
        config.description = "gate-fw-1.0".to_string();
        config.port = 0;
        let discovery = Discovery::new(config).unwrap();
        assert_eq!(discovery.reply(), "10.0.0.7?128*gate-fw-1.0");
    }
}
