//! End-to-end discovery tests over loopback.
//!
//! Broadcast does not reach loopback reliably, so requesters target the
//! responder's bound port directly via `discover_at`, the same way
//! point-to-point setups do. Every station binds port 0 to avoid clashes
//! between concurrently running tests.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use intercom_link::{DeviceType, Discovery, DiscoveryConfig, Number};

fn station(number: Number, addr: [u8; 4]) -> Discovery {
    let mut config = DiscoveryConfig::new(number, IpAddr::from(addr));
    config.port = 0;
    Discovery::new(config).expect("bind discovery endpoint")
}

fn loopback_target(discovery: &Discovery) -> SocketAddr {
    let port = discovery.local_addr().unwrap().port();
    SocketAddr::from((Ipv4Addr::LOCALHOST, port))
}

#[test]
fn resolves_a_peer_identifier() {
    let peer_number = Number::new(3, 502, None).unwrap();
    let responder = station(peer_number, [192, 168, 7, 31]);
    let requester = station(Number::new(3, 501, None).unwrap(), [192, 168, 7, 30]);

    let found = requester
        .discover_at(
            loopback_target(&responder),
            &peer_number,
            Duration::from_secs(2),
        )
        .unwrap();
    assert_eq!(found, Some(IpAddr::from([192, 168, 7, 31])));
}

#[test]
fn discover_times_out_without_responder() {
    let requester = station(Number::new(1, 101, None).unwrap(), [192, 168, 7, 30]);

    // A bound socket that never answers.
    let silent = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let target = silent.local_addr().unwrap();

    let timeout = Duration::from_millis(300);
    let start = Instant::now();
    let found = requester
        .discover_at(target, &Number::new(9, 900, None).unwrap(), timeout)
        .unwrap();
    assert_eq!(found, None);
    assert!(start.elapsed() >= timeout);
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[test]
fn answers_own_identifier_query() {
    let number = Number::new(8, 1204, Some(2)).unwrap();
    let mut config = DiscoveryConfig::new(number, IpAddr::from([10, 0, 0, 8]));
    config.device_type = DeviceType::ManagementConsole;
    config.description = "console-fw-2.4".to_string();
    config.port = 0;
    let responder = Discovery::new(config).unwrap();

    let probe = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    probe
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    probe
        .send_to(&number.encode(), loopback_target(&responder))
        .unwrap();

    let mut buf = [0u8; 1500];
    let (len, _) = probe.recv_from(&mut buf).unwrap();
    assert_eq!(&buf[..len], b"10.0.0.8?16*console-fw-2.4");
}

#[test]
fn ignores_queries_for_other_stations() {
    let responder = station(Number::new(8, 1204, None).unwrap(), [10, 0, 0, 8]);

    let probe = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    probe
        .set_read_timeout(Some(Duration::from_millis(500)))
        .unwrap();
    let other = Number::new(8, 1205, None).unwrap();
    probe
        .send_to(&other.encode(), loopback_target(&responder))
        .unwrap();

    let mut buf = [0u8; 1500];
    assert!(probe.recv_from(&mut buf).is_err());
}

#[test]
fn stop_joins_promptly() {
    let mut discovery = station(Number::new(1, 101, None).unwrap(), [10, 0, 0, 1]);
    let start = Instant::now();
    discovery.stop();
    assert!(start.elapsed() < Duration::from_secs(1));
}
