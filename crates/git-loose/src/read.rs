use std::fs;
use std::io::Read;

use flate2::read::ZlibDecoder;
use git_hash::hasher::Hasher;
use git_object::header;
use git_object::{Object, ObjectType};

use crate::{LooseError, LooseObjectStore};

impl LooseObjectStore {
    /// Check if a loose object exists.
    pub fn contains(&self, oid: &git_hash::ObjectId) -> bool {
        self.object_path(oid).is_file()
    }

    /// Read a loose object by OID.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    /// Returns `Err` if the object exists but is corrupt, including a
    /// recomputed-hash mismatch against `oid`.
    pub fn read(&self, oid: &git_hash::ObjectId) -> Result<Option<Object>, LooseError> {
        self.read_verified(oid)
    }

    /// Read just the header (type + size) without decompressing the full
    /// content where the on-disk format allows it.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    pub fn read_header(
        &self,
        oid: &git_hash::ObjectId,
    ) -> Result<Option<(ObjectType, usize)>, LooseError> {
        let path = self.object_path(oid);
        let raw = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LooseError::Io(e)),
        };

        if raw.is_empty() {
            return Err(LooseError::Corrupt {
                oid: oid.to_hex(),
                reason: "empty loose object file".into(),
            });
        }

        if header::packed::looks_like_header(raw[0]) {
            let (obj_type, size, _header_len) = header::packed::parse(&raw).map_err(|e| {
                LooseError::Corrupt {
                    oid: oid.to_hex(),
                    reason: e.to_string(),
                }
            })?;
            return Ok(Some((obj_type, size)));
        }

        // Legacy: the whole file is a zlib stream; decode just enough of it
        // to read the ASCII header.
        let mut decoder = ZlibDecoder::new(&raw[..]);
        let mut buf = [0u8; 64];
        let mut filled = 0;

        loop {
            if filled >= buf.len() {
                return Err(LooseError::Corrupt {
                    oid: oid.to_hex(),
                    reason: "header exceeds 64 bytes".into(),
                });
            }
            let n = decoder.read(&mut buf[filled..]).map_err(|e| LooseError::Decompress {
                oid: oid.to_hex(),
                source: e,
            })?;
            if n == 0 {
                return Err(LooseError::Corrupt {
                    oid: oid.to_hex(),
                    reason: "unexpected EOF before header null terminator".into(),
                });
            }
            filled += n;
            if buf[..filled].contains(&0) {
                break;
            }
        }

        let (obj_type, content_size, _header_len) = header::parse_header(&buf[..filled])?;
        Ok(Some((obj_type, content_size)))
    }

    /// Read a loose object and verify its recomputed hash matches `oid`.
    ///
    /// Auto-detects the on-disk format (legacy fully-deflated vs. packed-style
    /// plaintext-prefixed) by inspecting the first raw byte of the file,
    /// rather than relying on store configuration (§9: readers must accept
    /// both regardless of how the local store is configured to write).
    ///
    /// Returns `Ok(None)` if the object does not exist.
    pub fn read_verified(&self, oid: &git_hash::ObjectId) -> Result<Option<Object>, LooseError> {
        let path = self.object_path(oid);
        let raw = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LooseError::Io(e)),
        };

        if raw.is_empty() {
            return Err(LooseError::Corrupt {
                oid: oid.to_hex(),
                reason: "empty loose object file".into(),
            });
        }

        let (obj_type, content) = if header::packed::looks_like_header(raw[0]) {
            let (obj_type, size, header_len) = header::packed::parse(&raw).map_err(|e| {
                LooseError::Corrupt {
                    oid: oid.to_hex(),
                    reason: e.to_string(),
                }
            })?;
            let mut decoder = ZlibDecoder::new(&raw[header_len..]);
            let mut content = Vec::with_capacity(size);
            decoder.read_to_end(&mut content).map_err(|e| LooseError::Decompress {
                oid: oid.to_hex(),
                source: e,
            })?;
            if content.len() != size {
                return Err(LooseError::Corrupt {
                    oid: oid.to_hex(),
                    reason: format!(
                        "packed header declared {size} bytes, inflated {}",
                        content.len()
                    ),
                });
            }
            (obj_type, content)
        } else {
            let decompressed = decompress_all(&raw, oid)?;
            let (obj_type, content_size, header_len) = header::parse_header(&decompressed)?;
            if decompressed.len() - header_len != content_size {
                return Err(LooseError::Corrupt {
                    oid: oid.to_hex(),
                    reason: format!(
                        "legacy header declared {content_size} bytes, got {}",
                        decompressed.len() - header_len
                    ),
                });
            }
            (obj_type, decompressed[header_len..].to_vec())
        };

        // The digest always covers the canonical ASCII header + content,
        // regardless of which on-disk format was used.
        let canonical_header = header::write_header(obj_type, content.len());
        let mut hasher = Hasher::new(self.hash_algo);
        hasher.update(&canonical_header);
        hasher.update(&content);
        let actual_oid = hasher.finalize()?;

        if actual_oid != *oid {
            return Err(LooseError::HashMismatch {
                path,
                expected: oid.to_hex(),
                actual: actual_oid.to_hex(),
            });
        }

        let obj = Object::parse_content(obj_type, &content)?;
        Ok(Some(obj))
    }
}

/// Zlib-decompress the full contents of a legacy-format loose object file
/// (header and payload deflated together from byte 0).
fn decompress_all(compressed: &[u8], oid: &git_hash::ObjectId) -> Result<Vec<u8>, LooseError> {
    let mut decoder = ZlibDecoder::new(compressed);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed).map_err(|e| LooseError::Decompress {
        oid: oid.to_hex(),
        source: e,
    })?;
    Ok(decompressed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use git_hash::HashAlgorithm;

    #[test]
    fn read_nonexistent_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = LooseObjectStore::open(dir.path(), HashAlgorithm::Sha1);
        let oid = git_hash::ObjectId::from_hex("e69de29bb2d1d6434b8b29ae775ad8c2e48c5391").unwrap();
        assert!(store.read(&oid).unwrap().is_none());
    }

    #[test]
    fn read_back_roundtrip_legacy() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LooseObjectStore::open(dir.path(), HashAlgorithm::Sha1);
        store.set_legacy_headers(true);

        let oid = store.write_raw(ObjectType::Blob, b"hello").unwrap();
        let obj = store.read(&oid).unwrap().unwrap();
        assert_eq!(obj.object_type(), ObjectType::Blob);
        assert_eq!(obj.serialize_content().unwrap(), b"hello");
    }

    #[test]
    fn read_back_roundtrip_packed_style() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LooseObjectStore::open(dir.path(), HashAlgorithm::Sha1);
        store.set_legacy_headers(false);

        let oid = store.write_raw(ObjectType::Tree, b"").unwrap();
        let header_path = store.object_path(&oid);
        assert!(header_path.is_file());
        let obj = store.read(&oid).unwrap().unwrap();
        assert_eq!(obj.object_type(), ObjectType::Tree);
    }

    #[test]
    fn corrupted_byte_fails_verification() {
        let dir = tempfile::tempdir().unwrap();
        let store = LooseObjectStore::open(dir.path(), HashAlgorithm::Sha1);
        let oid = store.write_raw(ObjectType::Blob, b"hello").unwrap();

        let path = store.object_path(&oid);
        let mut bytes = fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        fs::write(&path, bytes).unwrap();

        let err = store.read(&oid).unwrap_err();
        assert!(matches!(
            err,
            LooseError::HashMismatch { .. } | LooseError::Decompress { .. } | LooseError::Corrupt { .. }
        ));
    }
}
