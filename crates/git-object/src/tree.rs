use std::cmp::Ordering;

use bstr::{BStr, BString, ByteSlice};
use git_hash::{HashAlgorithm, ObjectId};

use crate::ObjectError;

/// File mode for tree entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMode {
    /// Regular file (100644)
    Regular,
    /// Executable file (100755)
    Executable,
    /// Symbolic link (120000)
    Symlink,
    /// Git submodule link (160000)
    Gitlink,
    /// Subdirectory (040000)
    Tree,
    /// Unknown mode (preserved for round-trip)
    Unknown(u32),
}

impl FileMode {
    /// Parse from octal ASCII bytes (e.g., `b"100644"`).
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        let raw = parse_octal(s)
            .ok_or_else(|| ObjectError::InvalidFileMode(String::from_utf8_lossy(s).into()))?;
        Ok(Self::from_raw(raw))
    }

    /// Create from the raw numeric value.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0o100644 => Self::Regular,
            0o100755 => Self::Executable,
            0o120000 => Self::Symlink,
            0o160000 => Self::Gitlink,
            0o040000 => Self::Tree,
            other => Self::Unknown(other),
        }
    }

    /// Serialize to octal ASCII bytes (git's canonical format, no leading zeros for trees).
    pub fn as_bytes(&self) -> BString {
        BString::from(format!("{:o}", self.raw()))
    }

    /// Get the raw numeric value.
    pub fn raw(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Executable => 0o100755,
            Self::Symlink => 0o120000,
            Self::Gitlink => 0o160000,
            Self::Tree => 0o40000,
            Self::Unknown(v) => *v,
        }
    }

    /// Is this a tree (directory) entry?
    pub fn is_tree(&self) -> bool {
        matches!(self, Self::Tree)
    }

    /// Is this a blob (file) entry?
    pub fn is_blob(&self) -> bool {
        matches!(self, Self::Regular | Self::Executable)
    }

    /// Is this a symlink?
    pub fn is_symlink(&self) -> bool {
        matches!(self, Self::Symlink)
    }

    /// Is this a gitlink (submodule)?
    pub fn is_gitlink(&self) -> bool {
        matches!(self, Self::Gitlink)
    }
}

/// Parse an octal ASCII string to u32.
fn parse_octal(s: &[u8]) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut val: u32 = 0;
    for &b in s {
        if !(b'0'..=b'7').contains(&b) {
            return None;
        }
        val = val.checked_mul(8)?.checked_add(u32::from(b - b'0'))?;
    }
    Some(val)
}

/// A single entry in a git tree object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: FileMode,
    pub name: BString,
    pub oid: ObjectId,
}

impl TreeEntry {
    /// Compare entries using git's tree sorting rules.
    ///
    /// Directories sort as if they have a trailing '/'. This means
    /// "foo" (dir) sorts before "foo.c" but after "foo-bar".
    pub fn cmp_entries(a: &TreeEntry, b: &TreeEntry) -> Ordering {
        base_name_compare(
            a.name.as_ref(),
            a.mode.is_tree(),
            b.name.as_ref(),
            b.mode.is_tree(),
        )
    }
}

impl PartialOrd for TreeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TreeEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        Self::cmp_entries(self, other)
    }
}

/// Git's tree entry name comparison.
///
/// Faithfully implements C git's `base_name_compare`: after the common prefix,
/// directory names get an implicit trailing '/' for comparison.
fn base_name_compare(name1: &[u8], is_dir1: bool, name2: &[u8], is_dir2: bool) -> Ordering {
    let min_len = name1.len().min(name2.len());
    let cmp = name1[..min_len].cmp(&name2[..min_len]);
    if cmp != Ordering::Equal {
        return cmp;
    }
    // One name is a prefix of the other (or they're equal length).
    // Get the "next character" for each — null if at end, but '/' if it's a directory.
    let c1 = if name1.len() > min_len {
        name1[min_len]
    } else if is_dir1 {
        b'/'
    } else {
        0
    };
    let c2 = if name2.len() > min_len {
        name2[min_len]
    } else if is_dir2 {
        b'/'
    } else {
        0
    };
    c1.cmp(&c2)
}

/// A git tree object — a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse tree content from binary format.
    ///
    /// Each entry is: `<mode-ascii> <name>\0<oid-bytes>`
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < content.len() {
            // Parse mode (octal ASCII until space).
            let space_pos = content[pos..]
                .iter()
                .position(|&b| b == b' ')
                .ok_or_else(|| ObjectError::InvalidTreeEntry {
                    offset: pos,
                    reason: "missing space after mode".into(),
                })?
                + pos;

            let mode = FileMode::from_bytes(&content[pos..space_pos]).map_err(|_| {
                ObjectError::InvalidTreeEntry {
                    offset: pos,
                    reason: "invalid mode".into(),
                }
            })?;

            // Parse name (until null byte).
            let name_start = space_pos + 1;
            let null_pos = content[name_start..]
                .iter()
                .position(|&b| b == 0)
                .ok_or_else(|| ObjectError::InvalidTreeEntry {
                    offset: name_start,
                    reason: "missing null after name".into(),
                })?
                + name_start;

            let name = BString::from(&content[name_start..null_pos]);

            // Parse OID (raw bytes after null).
            let oid_start = null_pos + 1;
            // Determine hash size: try SHA-1 (20) first, then SHA-256 (32).
            let oid_len = 20; // SHA-1 is default for now.
            if oid_start + oid_len > content.len() {
                return Err(ObjectError::InvalidTreeEntry {
                    offset: oid_start,
                    reason: "truncated OID".into(),
                });
            }

            let oid = ObjectId::from_bytes(
                &content[oid_start..oid_start + oid_len],
                HashAlgorithm::Sha1,
            )?;

            entries.push(TreeEntry { mode, name, oid });
            pos = oid_start + oid_len;
        }

        Ok(Self { entries })
    }

    /// Serialize tree content to binary format.
    ///
    /// Entries must already be in git canonical sort order (see
    /// [`TreeEntry::cmp_entries`]) — a tree's id is part of its content
    /// address, so this does not silently re-sort a caller-constructed
    /// ordering. Call [`Tree::sort`] first if the entries aren't sorted.
    /// Fails with `UnsortedTree` if two adjacent entries are out of order
    /// (or equal), and `MissingObjectId` if an entry carries a null id.
    pub fn serialize_content(&self) -> Result<Vec<u8>, ObjectError> {
        for entry in &self.entries {
            if entry.oid.is_null() {
                return Err(ObjectError::MissingObjectId {
                    name: entry.name.clone(),
                });
            }
        }
        for pair in self.entries.windows(2) {
            if TreeEntry::cmp_entries(&pair[0], &pair[1]) != Ordering::Less {
                return Err(ObjectError::UnsortedTree {
                    first: pair[0].name.clone(),
                    second: pair[1].name.clone(),
                });
            }
        }

        let mut out = Vec::new();
        for entry in &self.entries {
            out.extend_from_slice(&entry.mode.as_bytes());
            out.push(b' ');
            out.extend_from_slice(&entry.name);
            out.push(0);
            out.extend_from_slice(entry.oid.as_bytes());
        }
        Ok(out)
    }

    /// Sort entries in git canonical order.
    pub fn sort(&mut self) {
        self.entries.sort();
    }

    /// Lookup an entry by name.
    pub fn find(&self, name: &BStr) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name.as_bstr() == name)
    }

    /// Iterate entries.
    pub fn iter(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
