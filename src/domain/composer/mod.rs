//! Composer domain module

mod draft;

pub use draft::{ComposerVariant, Draft, AUDIO_PLACEHOLDER_CAPTION};
