use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flate2::write::ZlibEncoder;
use git_hash::hasher::Hasher;
use git_hash::ObjectId;
use git_object::header;
use git_object::{Object, ObjectType};
use git_utils::tempfile::TempFile;

use crate::{LooseError, LooseObjectStore};

/// Buffer size used when streaming object content through the digest and
/// deflate pipeline. Not part of the on-disk contract — purely an internal
/// tuning knob.
const STREAM_CHUNK_SIZE: usize = 8 * 1024;

impl LooseObjectStore {
    /// Write an object to the loose store. Returns the OID.
    ///
    /// No-op if the object already exists (idempotent).
    /// The file is written atomically (temp file + rename).
    pub fn write(&self, obj: &Object) -> Result<ObjectId, LooseError> {
        let content = obj.serialize_content()?;
        self.write_raw(obj.object_type(), &content)
    }

    /// Write raw bytes with a known type. Returns the OID.
    ///
    /// No-op if the object already exists (idempotent).
    pub fn write_raw(&self, obj_type: ObjectType, content: &[u8]) -> Result<ObjectId, LooseError> {
        self.write_stream(obj_type, content.len(), &mut std::io::Cursor::new(content))
    }

    /// Stream `length` bytes of `obj_type` content from `reader` into the
    /// store. The digest and the deflate stream advance together over each
    /// chunk read, so the object is never held twice in memory and the
    /// on-disk file never exists before the id is known.
    ///
    /// Returns `LooseError::ShortInput` if `reader` yields fewer than
    /// `length` bytes before returning EOF.
    pub fn write_stream(
        &self,
        obj_type: ObjectType,
        length: usize,
        reader: &mut dyn Read,
    ) -> Result<ObjectId, LooseError> {
        let canonical_header = header::write_header(obj_type, length);

        let mut tmp = TempFile::new_in(&self.objects_dir)?;
        let tmp_path = tmp.path().to_path_buf();

        if !self.use_legacy_headers {
            // Non-legacy: the packed-style header is an uncompressed prefix
            // of the file; the deflate stream that follows covers payload
            // only.
            let packed_header = header::packed::write(obj_type, length);
            tmp.write_all(&packed_header)?;
        }

        let oid = {
            let mut hasher = Hasher::new(self.hash_algo);
            let file = tmp.file_mut().expect("temp file handle is open");
            let mut encoder = ZlibEncoder::new(file, self.compression_level);

            // The digest always covers the canonical ASCII header regardless
            // of on-disk mode: `ObjectId` is mode-independent. Only legacy
            // mode pushes the header through the deflate stream too — in
            // non-legacy mode it was already written above as plaintext.
            hasher.update(&canonical_header);
            if self.use_legacy_headers {
                encoder.write_all(&canonical_header)?;
            }

            let mut buf = [0u8; STREAM_CHUNK_SIZE];
            let mut remaining = length;
            while remaining > 0 {
                let want = remaining.min(buf.len());
                let n = reader.read(&mut buf[..want])?;
                if n == 0 {
                    return Err(LooseError::ShortInput {
                        expected: length,
                        actual: length - remaining,
                    });
                }
                hasher.update(&buf[..n]);
                encoder.write_all(&buf[..n])?;
                remaining -= n;
            }
            encoder.finish()?;

            hasher.finalize()?
        };

        // Mark read-only before it becomes visible under its final name,
        // matching C git's loose object convention.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o444))?;
        }

        // Dedup: another writer may have already committed this id. Let
        // `tmp` fall out of scope uncommitted so its RAII guard deletes it.
        if self.contains(&oid) {
            return Ok(oid);
        }

        let final_path = self.object_path(&oid);
        commit_rename(&tmp_path, &final_path)?;

        Ok(oid)
    }

    /// Write from a stream with known type and size. Returns the OID.
    ///
    /// Kept as a thin alias over [`Self::write_stream`] for callers that
    /// don't care about the distinction; both are single-pass and streaming.
    pub fn write_from_reader(
        &self,
        obj_type: ObjectType,
        size: usize,
        reader: &mut dyn std::io::Read,
    ) -> Result<ObjectId, LooseError> {
        self.write_stream(obj_type, size, reader)
    }
}

/// Atomically rename `tmp` into its content-addressed final location.
///
/// If the fan-out directory (`objects/xx/`) doesn't exist yet, create it and
/// retry the rename exactly once. If another writer wins the race and the
/// destination appears concurrently, treat it as success and drop `tmp`
/// (content-addressed idempotency). Any other persistent failure surfaces as
/// `WriteFailed` once the destination is confirmed still absent.
fn commit_rename(tmp: &Path, final_path: &Path) -> Result<(), LooseError> {
    if fs::rename(tmp, final_path).is_ok() {
        return Ok(());
    }
    if final_path.exists() {
        return Ok(());
    }

    if let Some(parent) = final_path.parent() {
        fs::create_dir_all(parent)?;
    }

    match fs::rename(tmp, final_path) {
        Ok(()) => Ok(()),
        Err(_) if final_path.exists() => Ok(()),
        Err(e) => Err(LooseError::WriteFailed {
            path: final_path.to_path_buf(),
            source: e,
        }),
    }
}
