//! The byte following the namespace of every share.
//!
//! ```text
//! | 7 bits: share version | 1 bit: sequence start |
//! ```

use crate::{consts::MAX_SHARE_VERSION, Error};

/// Share version and sequence start flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InfoByte(u8);

impl InfoByte {
    /// Pack a share version and sequence start flag.
    pub fn new(version: u8, is_sequence_start: bool) -> Result<Self, Error> {
        if version > MAX_SHARE_VERSION {
            return Err(Error::VersionOutOfRange(version));
        }
        Ok(Self((version << 1) | is_sequence_start as u8))
    }

    /// Interpret a raw info byte. Every byte is a valid info byte.
    pub fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    pub fn version(&self) -> u8 {
        self.0 >> 1
    }

    pub fn is_sequence_start(&self) -> bool {
        self.0 & 1 == 1
    }

    pub fn to_byte(self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, false, 0b0000_0000; "version 0 continuation")]
    #[test_case(0, true, 0b0000_0001; "version 0 start")]
    #[test_case(1, false, 0b0000_0010; "version 1 continuation")]
    #[test_case(1, true, 0b0000_0011; "version 1 start")]
    #[test_case(127, true, 0b1111_1111; "max version start")]
    fn test_info_byte(version: u8, is_sequence_start: bool, expected: u8) {
        let info = InfoByte::new(version, is_sequence_start).unwrap();
        assert_eq!(info.to_byte(), expected);
        assert_eq!(info.version(), version);
        assert_eq!(info.is_sequence_start(), is_sequence_start);

        let parsed = InfoByte::from_byte(expected);
        assert_eq!(parsed, info);
    }

    #[test]
    fn test_version_out_of_range() {
        assert!(matches!(
            InfoByte::new(128, false),
            Err(Error::VersionOutOfRange(128))
        ));
        assert!(matches!(
            InfoByte::new(255, true),
            Err(Error::VersionOutOfRange(255))
        ));
    }
}
