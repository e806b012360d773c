//! Resident/unit identifiers.
//!
//! Every station on the network is named by a block/room/extension triple.
//! The identifier travels in two forms: a human-readable `"BBBB-RRRR[-E]"`
//! string used by the discovery protocol, and a fixed 5-byte wire form
//! embedded in every control frame.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Length of the wire form of a [`Number`].
pub const WIRE_LEN: usize = 5;

/// Wire byte marking an absent extension.
const NO_EXTENSION: u8 = 0xFF;

/// Errors raised when constructing or parsing a [`Number`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The text form did not have 2 or 3 dash-separated parts.
    PartCount(usize),
    /// A part of the text form was not a decimal number.
    InvalidDigits(String),
    /// A field exceeded its digit width.
    OutOfRange {
        /// Which field was out of range.
        field: &'static str,
        /// The offending value.
        value: u32,
        /// The largest value the field can hold.
        max: u32,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::PartCount(n) => {
                write!(f, "expected 2 or 3 identifier parts, got {}", n)
            }
            FormatError::InvalidDigits(part) => {
                write!(f, "identifier part is not a decimal number: {:?}", part)
            }
            FormatError::OutOfRange { field, value, max } => {
                write!(f, "{} must be at most {}, got {}", field, max, value)
            }
        }
    }
}

impl std::error::Error for FormatError {}

/// A block/room/extension triple naming a resident unit or station.
///
/// Immutable once constructed; all range invariants are enforced by
/// [`Number::new`], which every other constructor funnels through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Number {
    block: u16,
    room: u16,
    extension: Option<u8>,
}

impl Number {
    /// Create an identifier, validating every field.
    ///
    /// `block` and `room` are four decimal digits (0–9999), `extension` a
    /// single digit (0–9) or absent.
    pub fn new(block: u16, room: u16, extension: Option<u8>) -> Result<Self, FormatError> {
        if block > 9999 {
            return Err(FormatError::OutOfRange {
                field: "block",
                value: u32::from(block),
                max: 9999,
            });
        }
        if room > 9999 {
            return Err(FormatError::OutOfRange {
                field: "room",
                value: u32::from(room),
                max: 9999,
            });
        }
        if let Some(ext) = extension {
            if ext > 9 {
                return Err(FormatError::OutOfRange {
                    field: "extension",
                    value: u32::from(ext),
                    max: 9,
                });
            }
        }
        Ok(Self {
            block,
            room,
            extension,
        })
    }

    /// Block number (0–9999).
    pub fn block(&self) -> u16 {
        self.block
    }

    /// Room number (0–9999).
    pub fn room(&self) -> u16 {
        self.room
    }

    /// Extension digit, if present.
    pub fn extension(&self) -> Option<u8> {
        self.extension
    }

    /// Decode the 5-byte wire form.
    ///
    /// Byte 0 is the extension or `0xFF` for "absent"; bytes 1–2 and 3–4
    /// split room and block at one hundred (`value = lo + hi * 100`).
    pub fn decode(bytes: &[u8; WIRE_LEN]) -> Result<Self, FormatError> {
        let extension = match bytes[0] {
            NO_EXTENSION => None,
            ext => Some(ext),
        };
        let room = u16::from(bytes[1]) + u16::from(bytes[2]) * 100;
        let block = u16::from(bytes[3]) + u16::from(bytes[4]) * 100;
        Self::new(block, room, extension)
    }

    /// Encode into the 5-byte wire form.
    pub fn encode(&self) -> [u8; WIRE_LEN] {
        [
            self.extension.unwrap_or(NO_EXTENSION),
            (self.room % 100) as u8,
            (self.room / 100) as u8,
            (self.block % 100) as u8,
            (self.block / 100) as u8,
        ]
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:04}", self.block, self.room)?;
        if let Some(ext) = self.extension {
            write!(f, "-{}", ext)?;
        }
        Ok(())
    }
}

impl FromStr for Number {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(FormatError::PartCount(parts.len()));
        }
        let block = parse_part(parts[0])?;
        let room = parse_part(parts[1])?;
        let extension = match parts.get(2) {
            Some(part) => Some(
                part.parse::<u8>()
                    .map_err(|_| FormatError::InvalidDigits(part.to_string()))?,
            ),
            None => None,
        };
        Self::new(block, room, extension)
    }
}

fn parse_part(part: &str) -> Result<u16, FormatError> {
    part.parse()
        .map_err(|_| FormatError::InvalidDigits(part.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_maximal_fields() {
        let number = Number::new(9999, 9999, Some(9)).unwrap();
        assert_eq!(number.block(), 9999);
        assert_eq!(number.room(), 9999);
        assert_eq!(number.extension(), Some(9));
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert!(matches!(
            Number::new(10000, 0, None),
            Err(FormatError::OutOfRange { field: "block", .. })
        ));
        assert!(matches!(
            Number::new(0, 10000, None),
            Err(FormatError::OutOfRange { field: "room", .. })
        ));
        assert!(matches!(
            Number::new(0, 0, Some(10)),
            Err(FormatError::OutOfRange {
                field: "extension",
                ..
            })
        ));
    }

    #[test]
    fn parses_two_and_three_part_forms() {
        let number: Number = "0001-0101".parse().unwrap();
        assert_eq!(number, Number::new(1, 101, None).unwrap());

        let number: Number = "12-34-5".parse().unwrap();
        assert_eq!(number, Number::new(12, 34, Some(5)).unwrap());
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(matches!(
            "1-2-3-4".parse::<Number>(),
            Err(FormatError::PartCount(4))
        ));
        assert!(matches!(
            "1".parse::<Number>(),
            Err(FormatError::PartCount(1))
        ));
        assert!(matches!(
            "a-2".parse::<Number>(),
            Err(FormatError::InvalidDigits(_))
        ));
        // A leading dash yields an empty first part, not a negative number.
        assert!(matches!(
            "-1-2".parse::<Number>(),
            Err(FormatError::InvalidDigits(_))
        ));
    }

    #[test]
    fn text_round_trip() {
        for number in [
            Number::new(0, 0, None).unwrap(),
            Number::new(1, 101, None).unwrap(),
            Number::new(9999, 9999, Some(9)).unwrap(),
        ] {
            assert_eq!(number.to_string().parse::<Number>().unwrap(), number);
        }
    }

    #[test]
    fn wire_round_trip() {
        for number in [
            Number::new(0, 0, None).unwrap(),
            Number::new(1, 101, None).unwrap(),
            Number::new(205, 1304, Some(0)).unwrap(),
            Number::new(9999, 9999, Some(9)).unwrap(),
        ] {
            assert_eq!(Number::decode(&number.encode()).unwrap(), number);
        }
    }

    #[test]
    fn wire_form_layout() {
        let number = Number::new(1, 101, None).unwrap();
        assert_eq!(number.encode(), [0xFF, 1, 1, 1, 0]);

        let number = Number::new(1234, 5678, Some(3)).unwrap();
        assert_eq!(number.encode(), [3, 78, 56, 34, 12]);
    }

    #[test]
    fn rejects_out_of_range_wire_bytes() {
        // 255 + 255 * 100 overflows the four-digit room field.
        assert!(matches!(
            Number::decode(&[0xFF, 0xFF, 0xFF, 0, 0]),
            Err(FormatError::OutOfRange { field: "room", .. })
        ));
        // A present extension byte still has to be a single digit.
        assert!(matches!(
            Number::decode(&[0xFE, 0, 0, 0, 0]),
            Err(FormatError::OutOfRange {
                field: "extension",
                ..
            })
        ));
    }

    #[test]
    fn formats_zero_padded() {
        assert_eq!(Number::new(1, 101, None).unwrap().to_string(), "0001-0101");
        assert_eq!(
            Number::new(12, 3, Some(7)).unwrap().to_string(),
            "0012-0003-7"
        );
    }
}
