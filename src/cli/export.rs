//! JSON export of the timeline

use serde::Serialize;

use crate::domain::timeline::{Timeline, TimelineEntry};

#[derive(Debug, Serialize)]
pub struct EntryExport<'a> {
    pub id: Option<u64>,
    pub created_at: String,
    pub time: String,
    pub kind: &'static str,
    pub author: &'a str,
    pub module: &'a str,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioExport>,
}

#[derive(Debug, Serialize)]
pub struct AudioExport {
    pub mime_type: String,
    pub duration_secs: u64,
    pub size_bytes: usize,
    pub data_url: String,
}

impl<'a> From<&'a TimelineEntry> for EntryExport<'a> {
    fn from(entry: &'a TimelineEntry) -> Self {
        Self {
            id: entry.id().map(|id| id.get()),
            created_at: entry.created_at().to_rfc3339(),
            time: entry.display_time(),
            kind: entry.kind().as_str(),
            author: entry.author(),
            module: entry.module().as_str(),
            text: entry.text(),
            audio: entry.artifact().map(|artifact| AudioExport {
                mime_type: artifact.mime_type().to_string(),
                duration_secs: artifact.duration().as_secs(),
                size_bytes: artifact.size_bytes(),
                data_url: artifact.to_data_url(),
            }),
        }
    }
}

/// Render the timeline, newest first, as pretty JSON
pub fn timeline_json(timeline: &Timeline) -> Result<String, serde_json::Error> {
    let entries: Vec<EntryExport<'_>> = timeline.entries().map(EntryExport::from).collect();
    serde_json::to_string_pretty(&entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::{AudioArtifact, AudioMimeType};
    use crate::domain::recording::Duration;
    use crate::domain::timeline::ModuleTag;
    use chrono::{Local, TimeZone};

    #[test]
    fn exports_notes_and_audio() {
        let at = Local.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut timeline = Timeline::new();
        timeline.prepend(TimelineEntry::note("hi", "Ana", ModuleTag::default(), at));
        timeline.prepend(TimelineEntry::audio(
            "voice",
            Some(AudioArtifact::new(
                vec![1, 2, 3],
                AudioMimeType::Ogg,
                Duration::from_secs(2),
            )),
            "Ana",
            ModuleTag::default(),
            at,
        ));

        let json: serde_json::Value =
            serde_json::from_str(&timeline_json(&timeline).unwrap()).unwrap();

        assert_eq!(json[0]["id"], 2);
        assert_eq!(json[0]["kind"], "audio");
        assert_eq!(json[0]["audio"]["duration_secs"], 2);
        assert_eq!(json[0]["audio"]["data_url"], "data:audio/ogg;base64,AQID");
        assert_eq!(json[1]["kind"], "note");
        assert_eq!(json[1]["time"], "09:00");
        assert!(json[1].get("audio").is_none());
    }
}
