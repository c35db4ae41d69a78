//! Sample timeline for `--demo`

use chrono::{DateTime, Local, NaiveTime};

use crate::domain::timeline::{ModuleTag, Timeline, TimelineEntry};

/// Build the two-entry sample timeline, stamped on the day of `now`
pub fn demo_timeline(now: DateTime<Local>) -> Timeline {
    let module = ModuleTag::new(ModuleTag::EDUCATION).unwrap_or_default();

    let at = |hour: u32, minute: u32| {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .and_then(|time| now.date_naive().and_time(time).and_local_timezone(Local).single())
            .unwrap_or(now)
    };

    Timeline::with_entries(vec![
        TimelineEntry::audio(
            "Audio recorded during group activity",
            None,
            "System",
            module.clone(),
            at(10, 15),
        ),
        TimelineEntry::note(
            "Arrived at school showing anxiety",
            "Teacher Ana",
            module,
            at(8, 30),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::timeline::EntryKind;
    use chrono::TimeZone;

    #[test]
    fn demo_has_note_then_captioned_audio() {
        let now = Local.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let timeline = demo_timeline(now);

        let entries: Vec<_> = timeline.entries().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind(), EntryKind::Audio);
        assert!(entries[0].artifact().is_none());
        assert_eq!(entries[0].display_time(), "10:15");
        assert_eq!(entries[1].text(), "Arrived at school showing anxiety");
        assert_eq!(entries[1].module().as_str(), "education");
    }
}
