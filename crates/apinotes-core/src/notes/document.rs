//! In-memory form of a notes file.
//!
//! Field names follow the YAML source keys. Unknown keys are ignored so
//! files written for richer consumers still load.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Which list of a notes file an entity came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Class,
    Protocol,
    Tag,
    Typedef,
    Function,
    Global,
    Enumerator,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Class,
        EntityKind::Protocol,
        EntityKind::Tag,
        EntityKind::Typedef,
        EntityKind::Function,
        EntityKind::Global,
        EntityKind::Enumerator,
    ];
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Class => "class",
            EntityKind::Protocol => "protocol",
            EntityKind::Tag => "tag",
            EntityKind::Typedef => "typedef",
            EntityKind::Function => "function",
            EntityKind::Global => "global variable",
            EntityKind::Enumerator => "enumerator",
        };
        f.write_str(name)
    }
}

/// Notes attached to one named declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityNotes {
    pub name: String,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub availability_msg: Option<String>,
    #[serde(default)]
    pub swift_name: Option<String>,
    #[serde(default)]
    pub swift_private: Option<bool>,
}

/// The per-kind entity lists shared by the top level and versioned blocks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityLists {
    #[serde(default)]
    pub classes: Vec<EntityNotes>,
    #[serde(default)]
    pub protocols: Vec<EntityNotes>,
    #[serde(default)]
    pub tags: Vec<EntityNotes>,
    #[serde(default)]
    pub typedefs: Vec<EntityNotes>,
    #[serde(default)]
    pub functions: Vec<EntityNotes>,
    #[serde(default)]
    pub globals: Vec<EntityNotes>,
    #[serde(default)]
    pub enumerators: Vec<EntityNotes>,
}

impl EntityLists {
    pub fn of_kind(&self, kind: EntityKind) -> &[EntityNotes] {
        match kind {
            EntityKind::Class => &self.classes,
            EntityKind::Protocol => &self.protocols,
            EntityKind::Tag => &self.tags,
            EntityKind::Typedef => &self.typedefs,
            EntityKind::Function => &self.functions,
            EntityKind::Global => &self.globals,
            EntityKind::Enumerator => &self.enumerators,
        }
    }

    pub fn lookup(&self, kind: EntityKind, name: &str) -> Option<&EntityNotes> {
        self.of_kind(kind).iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        EntityKind::ALL.iter().map(|&k| self.of_kind(k).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Notes that apply only when targeting a particular Swift version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VersionedNotes {
    /// Kept as written; YAML scalars like `4` or `4.2` are accepted too
    #[serde(deserialize_with = "version_text")]
    pub version: String,
    #[serde(flatten)]
    pub entities: EntityLists,
}

/// A whole notes file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotesDocument {
    pub name: String,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub availability_msg: Option<String>,
    #[serde(default)]
    pub swift_infer_import_as_member: Option<bool>,
    #[serde(flatten)]
    pub entities: EntityLists,
    #[serde(default)]
    pub swift_versions: Vec<VersionedNotes>,
}

fn version_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawVersion {
        Text(String),
        Integer(u64),
        Float(f64),
    }

    Ok(match RawVersion::deserialize(deserializer)? {
        RawVersion::Text(text) => text,
        RawVersion::Integer(major) => major.to_string(),
        RawVersion::Float(version) => version.to_string(),
    })
}
