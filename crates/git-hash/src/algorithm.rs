/// Which hash function an object store uses to derive identifiers.
///
/// SHA-1 is the only algorithm this subsystem's write path emits; SHA-256
/// support exists so readers (pack index parsing, multi-pack-index OID
/// version byte) can recognize a SHA-256 repository's on-disk layout without
/// misparsing it as SHA-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha1,
    Sha256,
}

impl HashAlgorithm {
    /// Length of a raw digest in bytes.
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
        }
    }

    /// Length of the hex-encoded digest.
    pub const fn hex_len(self) -> usize {
        self.digest_len() * 2
    }

    /// Infer the algorithm from a hex string's length.
    pub fn from_hex_len(len: usize) -> Option<Self> {
        match len {
            40 => Some(Self::Sha1),
            64 => Some(Self::Sha256),
            _ => None,
        }
    }
}
