//! Draft entity: uncommitted text and/or audio

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};

use crate::domain::audio::AudioArtifact;
use crate::domain::error::{InvalidVariantError, ValidationError};
use crate::domain::timeline::{ModuleTag, TimelineEntry};

/// Caption used when a draft is committed with audio but no text
pub const AUDIO_PLACEHOLDER_CAPTION: &str = "Audio recorded by the user";

/// Screen variant, which decides how much text a draft accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComposerVariant {
    /// Full observation form (500 characters)
    #[default]
    Full,
    /// Compact quick-note form (100 characters)
    Compact,
}

impl ComposerVariant {
    pub const ALL: &'static [&'static str] = &["full", "compact"];

    /// Maximum characters a draft of this variant stores
    pub const fn max_chars(&self) -> usize {
        match self {
            Self::Full => 500,
            Self::Compact => 100,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Compact => "compact",
        }
    }
}

impl fmt::Display for ComposerVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ComposerVariant {
    type Err = InvalidVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "compact" => Ok(Self::Compact),
            _ => Err(InvalidVariantError {
                input: s.to_string(),
            }),
        }
    }
}

/// In-progress entry content. Owns its artifact until commit.
#[derive(Debug)]
pub struct Draft {
    text: String,
    max_chars: usize,
    artifact: Option<AudioArtifact>,
}

impl Draft {
    /// Create an empty draft accepting up to `max_chars` characters
    pub fn new(max_chars: usize) -> Self {
        Self {
            text: String::new(),
            max_chars,
            artifact: None,
        }
    }

    /// Create an empty draft for a screen variant
    pub fn for_variant(variant: ComposerVariant) -> Self {
        Self::new(variant.max_chars())
    }

    /// Store text, clamped to the first `max_chars` characters.
    ///
    /// Returns whether the input was truncated.
    pub fn set_text(&mut self, text: &str) -> bool {
        match text.char_indices().nth(self.max_chars) {
            Some((cut, _)) => {
                self.text = text[..cut].to_string();
                true
            }
            None => {
                self.text = text.to_string();
                false
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Characters currently stored
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Attach audio, replacing any previous attachment.
    ///
    /// Returns the replaced artifact, if any.
    pub fn attach_artifact(&mut self, artifact: AudioArtifact) -> Option<AudioArtifact> {
        self.artifact.replace(artifact)
    }

    /// Drop the attached audio
    pub fn clear_artifact(&mut self) -> Option<AudioArtifact> {
        self.artifact.take()
    }

    pub fn artifact(&self) -> Option<&AudioArtifact> {
        self.artifact.as_ref()
    }

    pub fn has_artifact(&self) -> bool {
        self.artifact.is_some()
    }

    /// True iff the text is non-blank after trimming or audio is attached
    pub fn can_commit(&self) -> bool {
        !self.text.trim().is_empty() || self.artifact.is_some()
    }

    /// Turn the draft into a timeline entry, leaving the draft empty.
    /// An empty draft is rejected and left untouched.
    pub fn commit(
        &mut self,
        author: &str,
        module: &ModuleTag,
        now: DateTime<Local>,
    ) -> Result<TimelineEntry, ValidationError> {
        if !self.can_commit() {
            return Err(ValidationError::EmptyDraft);
        }

        let text = std::mem::take(&mut self.text);
        let trimmed = text.trim();

        let entry = match self.artifact.take() {
            Some(artifact) => {
                let caption = if trimmed.is_empty() {
                    AUDIO_PLACEHOLDER_CAPTION
                } else {
                    trimmed
                };
                TimelineEntry::audio(caption, Some(artifact), author, module.clone(), now)
            }
            None => TimelineEntry::note(trimmed, author, module.clone(), now),
        };

        Ok(entry)
    }
}

impl Default for Draft {
    fn default() -> Self {
        Self::for_variant(ComposerVariant::default())
    }
}
