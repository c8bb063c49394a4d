//! Share layout constants.

/// Size of a share in bytes.
pub const SHARE_SIZE: usize = 512;

/// Size of the namespace version in bytes.
pub const NAMESPACE_VERSION_SIZE: usize = 1;

/// Size of the namespace id in bytes.
pub const NAMESPACE_ID_SIZE: usize = 28;

/// Size of an encoded namespace (`version || id`) in bytes.
pub const NAMESPACE_SIZE: usize = NAMESPACE_VERSION_SIZE + NAMESPACE_ID_SIZE;

/// Number of leading zero bytes a version 0 namespace id must carry.
pub const NAMESPACE_VERSION_ZERO_PREFIX_SIZE: usize = 18;

/// Number of user-specifiable bytes in a version 0 namespace id.
pub const NAMESPACE_VERSION_ZERO_ID_SIZE: usize =
    NAMESPACE_ID_SIZE - NAMESPACE_VERSION_ZERO_PREFIX_SIZE;

/// The only namespace version currently supported.
pub const NAMESPACE_VERSION_ZERO: u8 = 0;

/// Version reserved for the full-width sentinel namespaces.
pub const NAMESPACE_VERSION_MAX: u8 = u8::MAX;

/// Size of the info byte.
pub const SHARE_INFO_BYTES: usize = 1;

/// Size of the sequence length field carried by sequence-start shares.
pub const SEQUENCE_LEN_BYTES: usize = 4;

/// Size of the reserved offset carried by compact shares.
pub const COMPACT_SHARE_RESERVED_BYTES: usize = 4;

/// Payload capacity of the first share of a compact sequence.
pub const FIRST_COMPACT_SHARE_CONTENT_SIZE: usize = SHARE_SIZE
    - NAMESPACE_SIZE
    - SHARE_INFO_BYTES
    - SEQUENCE_LEN_BYTES
    - COMPACT_SHARE_RESERVED_BYTES;

/// Payload capacity of a continuation share of a compact sequence.
pub const CONTINUATION_COMPACT_SHARE_CONTENT_SIZE: usize =
    SHARE_SIZE - NAMESPACE_SIZE - SHARE_INFO_BYTES - COMPACT_SHARE_RESERVED_BYTES;

/// Payload capacity of the first share of a sparse sequence.
pub const FIRST_SPARSE_SHARE_CONTENT_SIZE: usize =
    SHARE_SIZE - NAMESPACE_SIZE - SHARE_INFO_BYTES - SEQUENCE_LEN_BYTES;

/// Payload capacity of a continuation share of a sparse sequence.
pub const CONTINUATION_SPARSE_SHARE_CONTENT_SIZE: usize =
    SHARE_SIZE - NAMESPACE_SIZE - SHARE_INFO_BYTES;

/// Largest share version that fits in the info byte.
pub const MAX_SHARE_VERSION: u8 = 127;

/// Share version used by everything this crate writes.
pub const SHARE_VERSION_ZERO: u8 = 0;

/// Share versions accepted for blobs.
pub const SUPPORTED_SHARE_VERSIONS: [u8; 1] = [SHARE_VERSION_ZERO];

/// Smallest supported square size.
pub const DEFAULT_MIN_SQUARE_SIZE: usize = 1;

/// Largest square size supported by default.
pub const DEFAULT_MAX_SQUARE_SIZE: usize = 128;

/// Minimum number of shares in a square.
pub const MIN_SHARE_COUNT: usize = DEFAULT_MIN_SQUARE_SIZE * DEFAULT_MIN_SQUARE_SIZE;
