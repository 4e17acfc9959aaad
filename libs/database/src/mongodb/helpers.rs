use mongodb::error::{Error, ErrorKind, WriteFailure};

/// Server error code for a unique index violation
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Whether the driver error is a unique index violation
pub fn is_duplicate_key_error(err: &Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

/// Serialize a [`uuid::Uuid`] as its hyphenated string in every format.
///
/// `uuid`'s own impl switches to raw bytes for non human-readable
/// serializers, which is what the driver uses for documents, while filter
/// documents are built with [`mongodb::bson::to_bson`]. Pinning the string
/// form keeps stored ids and query ids comparable.
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct Event {
///     #[serde(rename = "_id", with = "database::mongodb::uuid_as_string")]
///     id: Uuid,
/// }
/// ```
pub mod uuid_as_string {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(id: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&id.hyphenated())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Uuid::parse_str(&raw).map_err(D::Error::custom)
    }
}

/// Serialize a `DateTime<Utc>` as a fixed-width RFC 3339 string with
/// millisecond precision (`2025-06-13T09:05:00.000Z`).
///
/// Every value has the same length, so sorting the stored strings sorts by
/// time. Sub-millisecond precision is dropped; truncate values with
/// [`chrono::SubsecRound::trunc_subsecs`] before storing if they are
/// compared after a round trip.
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct Event {
///     #[serde(with = "database::mongodb::timestamp_millis")]
///     created_at: DateTime<Utc>,
/// }
/// ```
pub mod timestamp_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}
