//! Write pipeline for events: `validate` → `normalize` → persist.
//!
//! Both steps are pure. [`validate`] merges the input over the stored event
//! (if any), checks presence, trims, then checks `mode` and the sequences.
//! [`normalize`] derives the slug and canonicalizes date and time for the
//! fields that changed.

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{EventError, EventResult};
use crate::models::{Event, EventInput, EventMode};
use crate::slug::slugify;

static TIME_24H: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]?[0-9]|2[0-3]):([0-5]?[0-9])$").unwrap());

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Input that passed validation, with every field present and trimmed
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEvent {
    pub title: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: EventMode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
}

/// Overlay `input` on `existing` and check the result.
///
/// Fails on the first problem found, in this order: a missing or blank
/// required field, an unknown `mode`, an empty `agenda` or `tags`.
pub fn validate(input: EventInput, existing: Option<&Event>) -> EventResult<ValidatedEvent> {
    let stored = |f: fn(&Event) -> &String| existing.map(|e| f(e).clone());
    let stored_list = |f: fn(&Event) -> &Vec<String>| existing.map(|e| f(e).clone());

    let title = required(input.title.or_else(|| stored(|e| &e.title)), "Title is required")?;
    let description = required(
        input.description.or_else(|| stored(|e| &e.description)),
        "Description is required",
    )?;
    let overview = required(
        input.overview.or_else(|| stored(|e| &e.overview)),
        "Overview is required",
    )?;
    let image = required(input.image.or_else(|| stored(|e| &e.image)), "Image is required")?;
    let venue = required(input.venue.or_else(|| stored(|e| &e.venue)), "Venue is required")?;
    let location = required(
        input.location.or_else(|| stored(|e| &e.location)),
        "Location is required",
    )?;
    let date = required(input.date.or_else(|| stored(|e| &e.date)), "Date is required")?;
    let time = required(input.time.or_else(|| stored(|e| &e.time)), "Time is required")?;
    let mode = required(
        input
            .mode
            .or_else(|| existing.map(|e| e.mode.to_string())),
        "Mode is required",
    )?;
    let audience = required(
        input.audience.or_else(|| stored(|e| &e.audience)),
        "Audience is required",
    )?;
    let agenda = input
        .agenda
        .or_else(|| stored_list(|e| &e.agenda))
        .ok_or_else(|| EventError::validation("Agenda is required"))?;
    let organizer = required(
        input.organizer.or_else(|| stored(|e| &e.organizer)),
        "Organizer is required",
    )?;
    let tags = input
        .tags
        .or_else(|| stored_list(|e| &e.tags))
        .ok_or_else(|| EventError::validation("Tags are required"))?;

    let mode = EventMode::from_str(&mode)
        .map_err(|_| EventError::validation("Mode must be online, offline, or hybrid"))?;

    if agenda.is_empty() {
        return Err(EventError::validation("Agenda must contain at least one item"));
    }
    if tags.is_empty() {
        return Err(EventError::validation("Tags must contain at least one item"));
    }

    Ok(ValidatedEvent {
        title,
        description,
        overview,
        image,
        venue,
        location,
        date,
        time,
        mode,
        audience,
        agenda,
        organizer,
        tags,
    })
}

/// Presence check on the trimmed value; returns the trimmed string.
fn required(value: Option<String>, message: &str) -> EventResult<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(EventError::validation(message)),
    }
}

/// Build the record to persist.
///
/// The slug is re-derived when there is no stored event or the title
/// changed. Date and time are canonicalized only when they differ from the
/// stored values. `createdAt` and the id survive updates. Timestamps are
/// kept to millisecond precision, the precision they are stored with.
pub fn normalize(
    validated: ValidatedEvent,
    existing: Option<&Event>,
    now: DateTime<Utc>,
) -> EventResult<Event> {
    let now = now.trunc_subsecs(3);
    let title_changed = existing.is_none_or(|e| e.title != validated.title);
    let slug = match existing {
        Some(e) if !title_changed && !e.slug.is_empty() => e.slug.clone(),
        _ => derive_slug(&validated.title)?,
    };

    let date = match existing {
        Some(e) if e.date == validated.date => validated.date,
        _ => normalize_date(&validated.date)?,
    };

    let time = match existing {
        Some(e) if e.time == validated.time => validated.time,
        _ => normalize_time(&validated.time)?,
    };

    Ok(Event {
        id: existing.map_or_else(Uuid::now_v7, |e| e.id),
        title: validated.title,
        slug,
        description: validated.description,
        overview: validated.overview,
        image: validated.image,
        venue: validated.venue,
        location: validated.location,
        date,
        time,
        mode: validated.mode,
        audience: validated.audience,
        agenda: validated.agenda,
        organizer: validated.organizer,
        tags: validated.tags,
        created_at: existing.map_or(now, |e| e.created_at),
        updated_at: now,
    })
}

fn derive_slug(title: &str) -> EventResult<String> {
    let slug = slugify(title);
    if slug.is_empty() {
        return Err(EventError::validation(
            "Title must contain at least one ASCII letter or digit",
        ));
    }
    Ok(slug)
}

/// Parse a calendar date in any accepted format and render it `YYYY-MM-DD`.
///
/// RFC 3339 timestamps are converted to UTC before the date is taken.
pub fn normalize_date(raw: &str) -> EventResult<String> {
    let raw = raw.trim();

    let parsed = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
        .ok_or_else(|| EventError::validation("invalid date"))?;

    Ok(parsed.format("%Y-%m-%d").to_string())
}

/// Check a 24-hour `H:MM`/`HH:MM` time and zero-pad it to `HH:MM`.
pub fn normalize_time(raw: &str) -> EventResult<String> {
    let caps = TIME_24H
        .captures(raw.trim())
        .ok_or_else(|| EventError::validation("invalid time"))?;

    Ok(format!("{:0>2}:{:0>2}", &caps[1], &caps[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn full_input() -> EventInput {
        EventInput {
            id: None,
            title: Some("  React Summit 2025!! ".into()),
            description: Some("The biggest React conference".into()),
            overview: Some("Two days of talks".into()),
            image: Some("https://cdn.example.com/react.png".into()),
            venue: Some("Beurs van Berlage".into()),
            location: Some("Amsterdam".into()),
            date: Some("June 13, 2025".into()),
            time: Some("9:5".into()),
            mode: Some("hybrid".into()),
            audience: Some("Frontend engineers".into()),
            agenda: Some(vec!["Keynote".into(), "Workshops".into()]),
            organizer: Some("GitNation".into()),
            tags: Some(vec!["react".into(), "frontend".into()]),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
    }

    fn prepare(input: EventInput, existing: Option<&Event>) -> EventResult<Event> {
        normalize(validate(input, existing)?, existing, now())
    }

    fn validation_message(result: EventResult<impl std::fmt::Debug>) -> String {
        match result {
            Err(EventError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_new_event_is_normalized() {
        let event = prepare(full_input(), None).unwrap();

        assert_eq!(event.title, "React Summit 2025!!");
        assert_eq!(event.slug, "react-summit-2025");
        assert_eq!(event.date, "2025-06-13");
        assert_eq!(event.time, "09:05");
        assert_eq!(event.mode, EventMode::Hybrid);
        assert_eq!(event.created_at, now());
        assert_eq!(event.updated_at, now());
    }

    #[test]
    fn test_timestamps_truncated_to_millis() {
        let at = now() + chrono::Duration::microseconds(123_456);
        let event = normalize(validate(full_input(), None).unwrap(), None, at).unwrap();

        assert_eq!(event.created_at, now() + chrono::Duration::milliseconds(123));
        assert_eq!(event.updated_at, event.created_at);
    }

    #[test]
    fn test_non_ascii_title_gets_a_fetchable_slug() {
        let mut input = full_input();
        input.title = Some("Café Tech Night".into());

        let event = prepare(input, None).unwrap();
        assert_eq!(event.title, "Café Tech Night");
        assert_eq!(event.slug, "caf-tech-night");
        assert_eq!(
            crate::slug::sanitize_lookup_key(&event.slug).as_deref(),
            Ok("caf-tech-night")
        );
    }

    #[test]
    fn test_title_without_ascii_letters_is_rejected() {
        let mut input = full_input();
        input.title = Some("東京".into());
        assert_eq!(
            validation_message(prepare(input, None)),
            "Title must contain at least one ASCII letter or digit"
        );
    }

    #[test]
    fn test_presence_checked_in_field_order() {
        let mut input = full_input();
        input.venue = None;
        input.tags = None;
        assert_eq!(validation_message(validate(input, None)), "Venue is required");

        let mut input = full_input();
        input.title = Some("   ".into());
        assert_eq!(validation_message(validate(input, None)), "Title is required");

        let mut input = full_input();
        input.tags = None;
        assert_eq!(validation_message(validate(input, None)), "Tags are required");
    }

    #[test]
    fn test_presence_before_mode_check() {
        let mut input = full_input();
        input.mode = Some("in-person".into());
        input.organizer = None;
        assert_eq!(
            validation_message(validate(input, None)),
            "Organizer is required"
        );
    }

    #[test]
    fn test_mode_must_be_known() {
        let mut input = full_input();
        input.mode = Some("in-person".into());
        input.agenda = Some(vec![]);
        assert_eq!(
            validation_message(validate(input, None)),
            "Mode must be online, offline, or hybrid"
        );

        let mut input = full_input();
        input.mode = Some(" online ".into());
        assert_eq!(validate(input, None).unwrap().mode, EventMode::Online);
    }

    #[test]
    fn test_sequences_must_not_be_empty() {
        let mut input = full_input();
        input.agenda = Some(vec![]);
        assert_eq!(
            validation_message(validate(input, None)),
            "Agenda must contain at least one item"
        );

        let mut input = full_input();
        input.tags = Some(vec![]);
        assert_eq!(
            validation_message(validate(input, None)),
            "Tags must contain at least one item"
        );
    }

    #[test]
    fn test_title_without_slug_characters_rejected() {
        let mut input = full_input();
        input.title = Some("!!!".into());
        assert!(matches!(prepare(input, None), Err(EventError::Validation(_))));
    }

    #[test]
    fn test_update_keeps_slug_when_title_unchanged() {
        let mut stored = prepare(full_input(), None).unwrap();
        stored.slug = "custom-slug".into();

        let update = EventInput {
            venue: Some("RAI Amsterdam".into()),
            ..Default::default()
        };
        let later = now() + chrono::Duration::hours(1);
        let updated = normalize(validate(update, Some(&stored)).unwrap(), Some(&stored), later)
            .unwrap();

        assert_eq!(updated.id, stored.id);
        assert_eq!(updated.slug, "custom-slug");
        assert_eq!(updated.venue, "RAI Amsterdam");
        assert_eq!(updated.created_at, stored.created_at);
        assert_eq!(updated.updated_at, later);
    }

    #[test]
    fn test_update_rederives_slug_when_title_changes() {
        let stored = prepare(full_input(), None).unwrap();
        let update = EventInput {
            title: Some("React Summit 2026".into()),
            ..Default::default()
        };
        let updated = prepare(update, Some(&stored)).unwrap();
        assert_eq!(updated.slug, "react-summit-2026");
    }

    #[test]
    fn test_unchanged_time_is_not_revalidated() {
        let mut stored = prepare(full_input(), None).unwrap();
        stored.time = "legacy".into();

        let update = EventInput {
            audience: Some("Everyone".into()),
            ..Default::default()
        };
        assert_eq!(prepare(update, Some(&stored)).unwrap().time, "legacy");

        let update = EventInput {
            time: Some("25:00".into()),
            ..Default::default()
        };
        assert_eq!(
            validation_message(prepare(update, Some(&stored))),
            "invalid time"
        );
    }

    #[test]
    fn test_normalize_date_formats() {
        for raw in [
            "2025-06-14",
            "2025/06/14",
            "06/14/2025",
            "June 14, 2025",
            "Jun 14, 2025",
            "14 June 2025",
            "2025-06-14T10:00:00Z",
            "2025-06-15T01:00:00+03:00",
        ] {
            assert_eq!(normalize_date(raw).unwrap(), "2025-06-14", "{raw}");
        }
    }

    #[test]
    fn test_normalize_date_rejects_garbage() {
        for raw in ["", "next friday", "2025-13-01", "2025-02-30"] {
            assert_eq!(validation_message(normalize_date(raw)), "invalid date");
        }
    }

    #[test]
    fn test_normalize_time() {
        assert_eq!(normalize_time("9:5").unwrap(), "09:05");
        assert_eq!(normalize_time("09:30").unwrap(), "09:30");
        assert_eq!(normalize_time(" 23:59 ").unwrap(), "23:59");
        assert_eq!(normalize_time("0:00").unwrap(), "00:00");

        for raw in ["25:00", "24:00", "12:60", "noon", "12", "12:30pm"] {
            assert_eq!(validation_message(normalize_time(raw)), "invalid time", "{raw}");
        }
    }
}
