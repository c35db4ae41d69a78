//! Timeline entry entity and its value objects

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};

use crate::domain::audio::AudioArtifact;
use crate::domain::error::InvalidModuleError;

/// Identifier assigned by the timeline on insertion. Monotonic per timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u64);

impl EntryId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(Self)
    }
}

/// Kind of content an entry carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Note,
    Audio,
}

impl EntryKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Module the entry was written from. Opaque to the core; only the
/// well-known names are listed for input validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleTag(String);

impl ModuleTag {
    pub const FAMILY: &'static str = "family";
    pub const EDUCATION: &'static str = "education";
    pub const PROFESSIONAL: &'static str = "professional";

    /// Module names the app ships with
    pub const WELL_KNOWN: &'static [&'static str] =
        &[Self::FAMILY, Self::EDUCATION, Self::PROFESSIONAL];

    /// Build a tag from any non-blank name
    pub fn new(name: impl AsRef<str>) -> Result<Self, InvalidModuleError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(InvalidModuleError {
                input: name.as_ref().to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_well_known(&self) -> bool {
        Self::WELL_KNOWN.contains(&self.0.as_str())
    }
}

impl Default for ModuleTag {
    fn default() -> Self {
        Self(Self::FAMILY.to_string())
    }
}

impl FromStr for ModuleTag {
    type Err = InvalidModuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ModuleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Entry payload
#[derive(Debug)]
pub enum EntryContent {
    Note {
        text: String,
    },
    /// Entries seeded from elsewhere may carry a caption but no playable audio
    Audio {
        caption: String,
        artifact: Option<AudioArtifact>,
    },
}

/// A committed timeline entry. Never mutated after creation, except for the
/// identifier the timeline assigns on insertion.
#[derive(Debug)]
pub struct TimelineEntry {
    id: Option<EntryId>,
    created_at: DateTime<Local>,
    author: String,
    module: ModuleTag,
    content: EntryContent,
}

impl TimelineEntry {
    /// Create a text note
    pub fn note(
        text: impl Into<String>,
        author: impl Into<String>,
        module: ModuleTag,
        created_at: DateTime<Local>,
    ) -> Self {
        Self {
            id: None,
            created_at,
            author: author.into(),
            module,
            content: EntryContent::Note { text: text.into() },
        }
    }

    /// Create an audio entry that owns its artifact
    pub fn audio(
        caption: impl Into<String>,
        artifact: Option<AudioArtifact>,
        author: impl Into<String>,
        module: ModuleTag,
        created_at: DateTime<Local>,
    ) -> Self {
        Self {
            id: None,
            created_at,
            author: author.into(),
            module,
            content: EntryContent::Audio {
                caption: caption.into(),
                artifact,
            },
        }
    }

    /// Pre-assign an identifier (for entries seeded from elsewhere)
    pub fn with_id(mut self, id: EntryId) -> Self {
        self.id = Some(id);
        self
    }

    pub(crate) fn assign_id(&mut self, id: EntryId) {
        self.id.get_or_insert(id);
    }

    pub fn id(&self) -> Option<EntryId> {
        self.id
    }

    pub fn kind(&self) -> EntryKind {
        match self.content {
            EntryContent::Note { .. } => EntryKind::Note,
            EntryContent::Audio { .. } => EntryKind::Audio,
        }
    }

    /// Note text, or the caption of an audio entry
    pub fn text(&self) -> &str {
        match &self.content {
            EntryContent::Note { text } => text,
            EntryContent::Audio { caption, .. } => caption,
        }
    }

    pub fn content(&self) -> &EntryContent {
        &self.content
    }

    /// The playable artifact, if any
    pub fn artifact(&self) -> Option<&AudioArtifact> {
        match &self.content {
            EntryContent::Audio { artifact, .. } => artifact.as_ref(),
            EntryContent::Note { .. } => None,
        }
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn module(&self) -> &ModuleTag {
        &self.module
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Two-digit 24h `HH:MM`
    pub fn display_time(&self) -> String {
        self.created_at.format("%H:%M").to_string()
    }
}
