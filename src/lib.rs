//! Control protocol and peer discovery for networked building intercom
//! stations.
//!
//! Stations — door stations, indoor monitors, elevator controllers,
//! management consoles — exchange fixed-layout binary control frames over
//! UDP, and locate each other by broadcasting resident identifiers on a
//! well-known discovery port.
//!
//! # Controlling a station
//!
//! Build a [`ControlMessage`], exchange it for the station's reply:
//!
//! ```no_run
//! use std::time::Duration;
//! use intercom_link::{transport, Body, Command, ControlMessage, Number, UnlockRequest};
//!
//! fn main() -> intercom_link::Result<()> {
//!     let request = ControlMessage::new(
//!         Command::RemoteUnlock,
//!         1,
//!         Number::new(1, 101, None)?,
//!         Number::new(0, 0, None)?,
//!         Body::Unlock(UnlockRequest::default()),
//!     );
//!     let reply = transport::exchange(
//!         "192.168.1.20".parse().unwrap(),
//!         &request,
//!         Duration::from_millis(200),
//!     )?;
//!     println!("acknowledged: {}", reply.is_ack);
//!     Ok(())
//! }
//! ```
//!
//! # Finding a station
//!
//! Every station runs a [`Discovery`] instance that answers queries for its
//! own identifier; the same instance resolves peers:
//!
//! ```no_run
//! use std::time::Duration;
//! use intercom_link::{Discovery, DiscoveryConfig, Number};
//!
//! let own = Number::new(1, 101, None).unwrap();
//! let config = DiscoveryConfig::new(own, "192.168.1.10".parse().unwrap());
//! let discovery = Discovery::new(config).unwrap();
//!
//! let peer = Number::new(1, 102, None).unwrap();
//! if let Some(addr) = discovery
//!     .discover(&peer, Duration::from_millis(200))
//!     .unwrap()
//! {
//!     println!("{} is at {}", peer, addr);
//! }
//! ```
//!
//! # Wire formats
//!
//! The control frame layout is documented in [`protocol`]; identifiers and
//! their 5-byte wire form in [`number`]. Both codecs are pure and safe to
//! call from any thread.

pub mod discovery;
mod error;
mod net_utils;
pub mod number;
pub mod protocol;
pub mod transport;

// Crate-level error types
pub use error::{Error, Result};

// Identifiers
pub use number::{FormatError, Number};

// Frame codec
pub use protocol::{
    Body, Command, ControlMessage, DateTimeAck, ProtocolError, UnlockRequest, VersionInfoAck,
    MAGIC, PROTOCOL_VERSION,
};

// Discovery
pub use discovery::{DeviceType, Discovery, DiscoveryConfig, DISCOVERY_PORT, GROUP_ADDR};

// Transport
pub use transport::CONTROL_PORT;
