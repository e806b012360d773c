//! One-shot control frame exchange.
//!
//! Control frames travel as single datagrams to a station's control port;
//! every request is answered by a single reply datagram. Anything beyond
//! that one round trip (retries, ordering, sessions) is the caller's
//! business.

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::time::Duration;

use log::debug;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use crate::error::Result;
use crate::protocol::ControlMessage;

/// Well-known control port.
pub const CONTROL_PORT: u16 = 17722;

/// Largest reply datagram accepted.
const MAX_DATAGRAM: usize = 1500;

/// Send one raw frame to `target` and wait up to `timeout` for the reply.
pub fn exchange_raw(target: SocketAddr, frame: &[u8], timeout: Duration) -> io::Result<Vec<u8>> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.set_broadcast(true)?;
    let bind_addr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0);
    socket.bind(&SockAddr::from(bind_addr))?;

    let socket: UdpSocket = socket.into();
    socket.set_read_timeout(Some(timeout))?;
    socket.connect(target)?;
    socket.send(frame)?;

    let mut buf = [0u8; MAX_DATAGRAM];
    let len = socket.recv(&mut buf)?;
    debug!("{} byte reply from {}", len, target);
    Ok(buf[..len].to_vec())
}

/// Send `request` to a specific endpoint and decode the reply.
pub fn exchange_at(
    target: SocketAddr,
    request: &ControlMessage,
    timeout: Duration,
) -> Result<ControlMessage> {
    let reply = exchange_raw(target, &request.encode(), timeout)?;
    Ok(ControlMessage::decode(&reply)?)
}

/// Send `request` to a station's control port and decode the reply.
pub fn exchange(addr: IpAddr, request: &ControlMessage, timeout: Duration) -> Result<ControlMessage> {
    exchange_at(SocketAddr::from((addr, CONTROL_PORT)), request, timeout)
}
