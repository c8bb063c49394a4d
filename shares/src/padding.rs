//! Shares that carry no data.
//!
//! Every padding share is a sequence start that declares a sequence length of zero. They differ
//! only in namespace:
//!
//! - namespace padding follows a blob (or transactions) in the same namespace,
//! - reserved padding sits between the reserved namespaces and the first blob,
//! - tail padding fills the square after the last blob.

use crate::{
    consts::{SHARE_SIZE, SHARE_VERSION_ZERO},
    info_byte::InfoByte,
    namespace::{Namespace, RESERVED_PADDING_NAMESPACE, TAIL_PADDING_NAMESPACE},
    share::Share,
    Error,
};

fn padding_share(namespace: Namespace, info: InfoByte) -> Share {
    let mut data = Share::header(&namespace, info, false);
    data.resize(SHARE_SIZE, 0);
    Share::from_parts(namespace, data)
}

fn padding_shares(namespace: Namespace, info: InfoByte, n: usize) -> Vec<Share> {
    vec![padding_share(namespace, info); n]
}

fn version_zero_start() -> InfoByte {
    InfoByte::from_byte((SHARE_VERSION_ZERO << 1) | 1)
}

/// A padding share in `namespace`.
pub fn namespace_padding_share(namespace: Namespace, share_version: u8) -> Result<Share, Error> {
    let info = InfoByte::new(share_version, true)?;
    Ok(padding_share(namespace, info))
}

/// `n` padding shares in `namespace`.
pub fn namespace_padding_shares(
    namespace: Namespace,
    share_version: u8,
    n: usize,
) -> Result<Vec<Share>, Error> {
    let info = InfoByte::new(share_version, true)?;
    Ok(padding_shares(namespace, info, n))
}

/// A padding share in the reserved padding namespace.
pub fn reserved_padding_share() -> Share {
    padding_share(RESERVED_PADDING_NAMESPACE, version_zero_start())
}

/// `n` padding shares in the reserved padding namespace.
pub fn reserved_padding_shares(n: usize) -> Vec<Share> {
    padding_shares(RESERVED_PADDING_NAMESPACE, version_zero_start(), n)
}

/// A padding share in the tail padding namespace.
pub fn tail_padding_share() -> Share {
    padding_share(TAIL_PADDING_NAMESPACE, version_zero_start())
}

/// `n` padding shares in the tail padding namespace.
pub fn tail_padding_shares(n: usize) -> Vec<Share> {
    padding_shares(TAIL_PADDING_NAMESPACE, version_zero_start(), n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::TX_NAMESPACE;
    use tessera_utils::hex;

    #[test]
    fn test_tail_padding_share() {
        let share = tail_padding_share();
        let mut expected = format!("{}fe", "ff".repeat(28));
        expected.push_str("01");
        expected.push_str(&"00".repeat(SHARE_SIZE - 30));
        assert_eq!(hex(share.as_bytes()), expected);
        assert!(share.is_padding());
        assert!(share.is_namespace_padding());
        assert_eq!(share.sequence_len(), 0);
    }

    #[test]
    fn test_namespace_padding_share() {
        let namespace = Namespace::new_v0(&[3; 10]).unwrap();
        let share = namespace_padding_share(namespace, 0).unwrap();
        assert_eq!(share.namespace(), namespace);
        assert!(share.is_sequence_start());
        assert!(share.is_padding());
        assert!(share.raw_data().iter().all(|b| *b == 0));

        // Compact namespaces are padded with a zero reserved offset
        let share = namespace_padding_share(TX_NAMESPACE, 0).unwrap();
        assert_eq!(share.reserved_offset(), Some(0));
        assert!(share.is_padding());

        assert!(matches!(
            namespace_padding_share(namespace, 128),
            Err(Error::VersionOutOfRange(128))
        ));
    }

    #[test]
    fn test_padding_counts() {
        assert!(tail_padding_shares(0).is_empty());
        assert_eq!(tail_padding_shares(5).len(), 5);
        let reserved = reserved_padding_shares(3);
        assert_eq!(reserved.len(), 3);
        assert!(reserved.iter().all(|share| share.namespace().is_reserved_padding()));
        let namespace = Namespace::new_v0(&[3; 10]).unwrap();
        assert_eq!(namespace_padding_shares(namespace, 0, 2).unwrap().len(), 2);
    }
}
