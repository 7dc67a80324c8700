//! Loose object storage: read, write, and enumerate zlib-compressed objects.
//!
//! Each loose object lives at `.git/objects/XX/YYYY...` where `XX` is the first
//! byte of the OID in hex and `YYYY...` is the rest. The file content is
//! zlib-compressed `"<type> <size>\0<content>"`.

mod enumerate;
mod read;
mod stream;
mod write;

pub use enumerate::LooseObjectIter;
pub use stream::LooseObjectStream;

use git_hash::{HashAlgorithm, ObjectId};
use std::path::{Path, PathBuf};

/// Interface to the loose object directory (`.git/objects/`).
pub struct LooseObjectStore {
    /// Path to the objects directory.
    objects_dir: PathBuf,
    /// Hash algorithm in use.
    hash_algo: HashAlgorithm,
    /// Zlib compression level.
    compression_level: flate2::Compression,
    /// `core.useLegacyHeaders`: when true, writers deflate the canonical
    /// ASCII header together with the payload (the classic on-disk format);
    /// when false, writers emit the packed-style header as a plaintext
    /// prefix and deflate only the payload. Readers accept both regardless
    /// of this setting by auto-detecting on the first raw byte.
    use_legacy_headers: bool,
}

impl LooseObjectStore {
    /// Open the loose object store at the given path.
    ///
    /// Defaults to `core.compression = 1` (speed over ratio, matching C
    /// git's default) and `core.useLegacyHeaders = false`.
    pub fn open(objects_dir: impl AsRef<Path>, hash_algo: HashAlgorithm) -> Self {
        Self {
            objects_dir: objects_dir.as_ref().to_path_buf(),
            hash_algo,
            compression_level: flate2::Compression::new(1),
            use_legacy_headers: false,
        }
    }

    /// Set the zlib compression level (0–9, or pass through flate2's
    /// default for any out-of-range value such as the config sentinel -1).
    pub fn set_compression_level(&mut self, level: i32) {
        self.compression_level = if (0..=9).contains(&level) {
            flate2::Compression::new(level as u32)
        } else {
            flate2::Compression::default()
        };
    }

    /// Set `core.useLegacyHeaders`.
    pub fn set_legacy_headers(&mut self, use_legacy_headers: bool) {
        self.use_legacy_headers = use_legacy_headers;
    }

    /// Whether this store writes loose objects using the legacy on-disk
    /// header format.
    pub fn uses_legacy_headers(&self) -> bool {
        self.use_legacy_headers
    }

    /// Get the hash algorithm in use.
    pub fn hash_algo(&self) -> HashAlgorithm {
        self.hash_algo
    }

    /// Get the file path for a given OID.
    pub fn object_path(&self, oid: &ObjectId) -> PathBuf {
        self.objects_dir.join(oid.loose_path())
    }
}

/// Errors from loose object operations.
#[derive(Debug, thiserror::Error)]
pub enum LooseError {
    #[error("corrupt loose object {oid}: {reason}")]
    Corrupt { oid: String, reason: String },

    #[error("decompression error for {oid}: {source}")]
    Decompress {
        oid: String,
        #[source]
        source: std::io::Error,
    },

    #[error("hash mismatch for {path}: expected {expected}, got {actual}")]
    HashMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("object parse error: {0}")]
    Object(#[from] git_object::ObjectError),

    #[error("hash error: {0}")]
    Hash(#[from] git_hash::HashError),

    #[error("declared length {expected} but input ended after {actual} bytes")]
    ShortInput { expected: usize, actual: usize },

    #[error("failed to commit object to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Util(#[from] git_utils::UtilError),
}
