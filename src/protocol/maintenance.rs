//! Body codecs for the device maintenance command family (`0x05xx`).

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use super::body::{Body, BodyEntry};
use super::command::Command;
use super::error::ProtocolError;

/// Status byte carried by successful maintenance replies.
const STATUS_OK: u8 = 1;

/// Acknowledgement body of [`Command::GetSetVersionInfo`].
///
/// Carries the largest frame the station accepts and its firmware version
/// banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfoAck {
    max_frame_len: u16,
    version: String,
}

impl VersionInfoAck {
    /// Maximum frame length stations advertise by default.
    pub const DEFAULT_MAX_FRAME_LEN: u16 = 1200;

    /// Fixed prefix: status byte, max frame length, version length byte.
    const FIXED_LEN: usize = 4;

    /// Build a reply; the version banner must fit its one-byte length field.
    pub fn new(max_frame_len: u16, version: impl Into<String>) -> Result<Self, ProtocolError> {
        let version = version.into();
        if version.len() > usize::from(u8::MAX) {
            return Err(ProtocolError::InvalidData(format!(
                "version banner too long: {} bytes",
                version.len()
            )));
        }
        Ok(Self {
            max_frame_len,
            version,
        })
    }

    /// Largest frame the station accepts.
    pub fn max_frame_len(&self) -> u16 {
        self.max_frame_len
    }

    /// Firmware version banner.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub(crate) fn len(&self) -> usize {
        Self::FIXED_LEN + self.version.len()
    }

    pub(crate) fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(STATUS_OK);
        buf.extend_from_slice(&self.max_frame_len.to_le_bytes());
        buf.push(self.version.len() as u8);
        buf.extend_from_slice(self.version.as_bytes());
    }

    fn unpack(buf: &[u8]) -> Result<Body, ProtocolError> {
        if buf.len() < Self::FIXED_LEN {
            return Err(ProtocolError::BodyLength {
                expected: Self::FIXED_LEN,
                actual: buf.len(),
            });
        }
        let max_frame_len = u16::from_le_bytes([buf[1], buf[2]]);
        let declared = usize::from(buf[3]);
        let rest = &buf[Self::FIXED_LEN..];
        if declared != rest.len() {
            return Err(ProtocolError::BodyLength {
                expected: declared,
                actual: rest.len(),
            });
        }
        let version = std::str::from_utf8(rest)
            .map_err(|err| ProtocolError::InvalidData(format!("version banner: {}", err)))?;
        Ok(Body::VersionInfo(Self {
            max_frame_len,
            version: version.to_string(),
        }))
    }
}

/// Acknowledgement body of [`Command::GetSetDateTime`]: the station clock.
///
/// The year travels as a century byte plus a year-in-century byte;
/// sub-second precision does not exist on the wire and is truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeAck {
    time: NaiveDateTime,
}

impl DateTimeAck {
    /// Status, century, year, month, day, hour, minute, second.
    const LEN: usize = 8;

    /// Build a reply; the year must fit four decimal digits.
    pub fn new(time: NaiveDateTime) -> Result<Self, ProtocolError> {
        if !(0..=9999).contains(&time.year()) {
            return Err(ProtocolError::InvalidData(format!(
                "year out of range: {}",
                time.year()
            )));
        }
        let time = time.with_nanosecond(0).unwrap_or(time);
        Ok(Self { time })
    }

    /// The station clock value.
    pub fn time(&self) -> NaiveDateTime {
        self.time
    }

    pub(crate) fn len(&self) -> usize {
        Self::LEN
    }

    pub(crate) fn encode(&self, buf: &mut Vec<u8>) {
        let year = self.time.year() as u16;
        buf.push(STATUS_OK);
        buf.push((year / 100) as u8);
        buf.push((year % 100) as u8);
        buf.push(self.time.month() as u8);
        buf.push(self.time.day() as u8);
        buf.push(self.time.hour() as u8);
        buf.push(self.time.minute() as u8);
        buf.push(self.time.second() as u8);
    }

    fn unpack(buf: &[u8]) -> Result<Body, ProtocolError> {
        if buf.len() != Self::LEN {
            return Err(ProtocolError::BodyLength {
                expected: Self::LEN,
                actual: buf.len(),
            });
        }
        let year = i32::from(buf[1]) * 100 + i32::from(buf[2]);
        let time = NaiveDate::from_ymd_opt(year, u32::from(buf[3]), u32::from(buf[4]))
            .and_then(|date| {
                date.and_hms_opt(u32::from(buf[5]), u32::from(buf[6]), u32::from(buf[7]))
            })
            .ok_or_else(|| {
                ProtocolError::InvalidData(format!(
                    "impossible date-time {:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                    year, buf[3], buf[4], buf[5], buf[6], buf[7]
                ))
            })?;
        Ok(Body::DateTime(Self { time }))
    }
}

/// Contribute this family's codecs to the shared registry table.
pub(crate) fn register(table: &mut HashMap<u16, BodyEntry>) {
    table.insert(
        Command::GetSetVersionInfo.code(),
        BodyEntry {
            request: None,
            ack: Some(VersionInfoAck::unpack),
        },
    );
    table.insert(
        Command::GetSetDateTime.code(),
        BodyEntry {
            request: None,
            ack: Some(DateTimeAck::unpack),
        },
    );
}
