use std::fs;
use std::io::{Read, Seek, SeekFrom};

use flate2::read::ZlibDecoder;
use git_object::header;
use git_object::ObjectType;

use crate::{LooseError, LooseObjectStore};

/// Streaming reader for a loose object.
///
/// Decompresses data on demand as [`Read`] is called.
/// The header has already been parsed; reads yield only the content bytes.
pub struct LooseObjectStream {
    obj_type: ObjectType,
    size: usize,
    decoder: ZlibDecoder<fs::File>,
    bytes_read: usize,
}

impl LooseObjectStream {
    /// The object type.
    pub fn object_type(&self) -> ObjectType {
        self.obj_type
    }

    /// The declared content size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// How many content bytes remain to be read.
    pub fn bytes_remaining(&self) -> usize {
        self.size.saturating_sub(self.bytes_read)
    }
}

impl Read for LooseObjectStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let remaining = self.bytes_remaining();
        if remaining == 0 {
            return Ok(0);
        }
        // Don't read past the declared content size.
        let max_read = remaining.min(buf.len());
        let n = self.decoder.read(&mut buf[..max_read])?;
        self.bytes_read += n;
        Ok(n)
    }
}

/// Largest possible packed-style header: one type+size byte plus up to nine
/// continuation bytes for a 64-bit size.
const PACKED_HEADER_PROBE_LEN: usize = 16;

impl LooseObjectStore {
    /// Open a streaming reader for a loose object.
    ///
    /// Returns `Ok(None)` if the object does not exist. Auto-detects the
    /// on-disk format (legacy fully-deflated vs. packed-style
    /// plaintext-prefixed) the same way [`Self::read_verified`] does, by
    /// inspecting the first raw byte of the file.
    pub fn stream(
        &self,
        oid: &git_hash::ObjectId,
    ) -> Result<Option<LooseObjectStream>, LooseError> {
        let path = self.object_path(oid);

        let mut probe_buf = [0u8; PACKED_HEADER_PROBE_LEN];
        let probed = {
            let mut probe_file = match fs::File::open(&path) {
                Ok(f) => f,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(LooseError::Io(e)),
            };
            probe_file.read(&mut probe_buf)?
        };

        if probed == 0 {
            return Err(LooseError::Corrupt {
                oid: oid.to_hex(),
                reason: "empty loose object file".into(),
            });
        }

        if header::packed::looks_like_header(probe_buf[0]) {
            let (obj_type, size, header_len) =
                header::packed::parse(&probe_buf[..probed]).map_err(|e| LooseError::Corrupt {
                    oid: oid.to_hex(),
                    reason: e.to_string(),
                })?;

            let mut file = fs::File::open(&path)?;
            file.seek(SeekFrom::Start(header_len as u64))?;

            return Ok(Some(LooseObjectStream {
                obj_type,
                size,
                decoder: ZlibDecoder::new(file),
                bytes_read: 0,
            }));
        }

        // Legacy: decompress just the header to learn type + size + header length.
        let file = fs::File::open(&path)?;
        let mut decoder = ZlibDecoder::new(file);
        let mut hdr_buf = [0u8; 64];
        let mut filled = 0;

        loop {
            if filled >= hdr_buf.len() {
                return Err(LooseError::Corrupt {
                    oid: oid.to_hex(),
                    reason: "header exceeds 64 bytes".into(),
                });
            }
            let n = decoder.read(&mut hdr_buf[filled..]).map_err(|e| LooseError::Decompress {
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
            if hdr_buf[..filled].contains(&0) {
                break;
            }
        }

        let (obj_type, content_size, header_len) = header::parse_header(&hdr_buf[..filled])?;

        // Re-open and position the decoder right after the header so that
        // subsequent reads yield only content bytes.
        let file2 = fs::File::open(&path)?;
        let mut decoder2 = ZlibDecoder::new(file2);
        let mut skip_buf = vec![0u8; header_len];
        decoder2.read_exact(&mut skip_buf).map_err(|e| LooseError::Decompress {
            oid: oid.to_hex(),
            source: e,
        })?;

        Ok(Some(LooseObjectStream {
            obj_type,
            size: content_size,
            decoder: decoder2,
            bytes_read: 0,
        }))
    }
}
