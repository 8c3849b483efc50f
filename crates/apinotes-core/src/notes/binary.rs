//! Binary form of compiled notes.
//!
//! Layout: 4-byte magic, little-endian `u16` major and minor format
//! version, then a `bincode` payload of [`CompiledNotes`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::document::EntityLists;
use super::VersionTuple;

pub const MAGIC: &[u8; 4] = b"APNB";

/// Format version - bump the major when the payload layout changes
pub const FORMAT_VERSION_MAJOR: u16 = 1;
pub const FORMAT_VERSION_MINOR: u16 = 0;

const HEADER_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("buffer too short for a notes header ({0} bytes)")]
    Truncated(usize),

    #[error("not a compiled notes buffer (bad magic)")]
    BadMagic,

    #[error("unsupported notes format version {found}.{minor} (expected {expected}.x)")]
    UnsupportedVersion { found: u16, minor: u16, expected: u16 },

    #[error("corrupt notes payload: {0}")]
    Corrupt(#[from] bincode::Error),
}

/// Validated contents of a notes file, ready for lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledNotes {
    pub module_name: String,
    pub availability: Option<String>,
    pub availability_msg: Option<String>,
    pub swift_infer_import_as_member: Option<bool>,
    pub entities: EntityLists,
    pub versioned: Vec<(VersionTuple, EntityLists)>,
}

impl CompiledNotes {
    pub fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let payload = bincode::serialize(self)?;
        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&FORMAT_VERSION_MAJOR.to_le_bytes());
        bytes.extend_from_slice(&FORMAT_VERSION_MINOR.to_le_bytes());
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < HEADER_LEN {
            return Err(FormatError::Truncated(bytes.len()));
        }
        if &bytes[..4] != MAGIC {
            return Err(FormatError::BadMagic);
        }
        let major = u16::from_le_bytes([bytes[4], bytes[5]]);
        let minor = u16::from_le_bytes([bytes[6], bytes[7]]);
        if major != FORMAT_VERSION_MAJOR {
            return Err(FormatError::UnsupportedVersion {
                found: major,
                minor,
                expected: FORMAT_VERSION_MAJOR,
            });
        }
        Ok(bincode::deserialize(&bytes[HEADER_LEN..])?)
    }
}
