//! Voice Timeline - voice notes and text posts on a per-module timeline
//!
//! This crate records short voice notes from the microphone, lets the user
//! play them back or drop them before posting, and merges text and audio
//! entries into a newest-first timeline.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, the recording state machine, draft and timeline
//! - **Application**: Recorder, playback and composer use cases, and port traits
//! - **Infrastructure**: Adapter implementations (cpal, rodio, notify-rust, TOML config)
//! - **CLI**: Argument parsing, the interactive session and output formatting

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
