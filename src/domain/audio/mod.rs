//! Audio domain module

mod artifact;
mod policy;

pub use artifact::{AudioArtifact, AudioMimeType};
pub use policy::{InvalidPolicyError, PlaybackPolicy};
