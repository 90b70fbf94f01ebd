use std::fmt;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identifier assigned by the remote API when a deadline is created.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct DeadlineId(pub u64);

impl fmt::Display for DeadlineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for DeadlineId {
    fn from(id: u64) -> Self {
        DeadlineId(id)
    }
}

/// A titled, described goal with a due moment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Deadline {
    /// Unique identifier, immutable once assigned by the server.
    pub id: DeadlineId,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// The moment the deadline is due.
    #[serde(with = "wire_date")]
    pub end_date: DateTime<Utc>,
}

/// Unchecked contents of a create or update form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeadlineDraft {
    pub title: String,
    pub description: String,
    pub end_date: Option<DateTime<Utc>>,
}

impl DeadlineDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        end_date: Option<DateTime<Utc>>,
    ) -> Self {
        DeadlineDraft {
            title: title.into(),
            description: description.into(),
            end_date,
        }
    }

    /// Checks the draft the same way the submission form does: name first,
    /// then description, then date.
    pub fn validate(self) -> Result<ValidDraft, ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        let end_date = self.end_date.ok_or(ValidationError::InvalidDate)?;
        Ok(ValidDraft {
            title: self.title,
            description: self.description,
            end_date,
        })
    }
}

/// A draft that passed [`DeadlineDraft::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    title: String,
    description: String,
    end_date: DateTime<Utc>,
}

impl ValidDraft {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn end_date(&self) -> DateTime<Utc> {
        self.end_date
    }

    /// Attaches an existing id, producing the record an update request carries.
    pub fn into_deadline(self, id: DeadlineId) -> Deadline {
        Deadline {
            id,
            title: self.title,
            description: self.description,
            end_date: self.end_date,
        }
    }
}

/// Formats an instant as `YYYY-MM-DD` using the local calendar day.
pub fn encode_date_for_sending(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

/// Human-readable due date, e.g. `Monday, 3rd of June, 2024`.
pub fn format_date_for_showing(date: DateTime<Utc>) -> String {
    let local = date.with_timezone(&Local);
    format!(
        "{}, {} of {}, {}",
        local.format("%A"),
        ordinal(local.day()),
        local.format("%B"),
        local.year()
    )
}

/// Compact time remaining until `end_date`, e.g. `3d 4h`, or `Finished`.
pub fn format_time_left(end_date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let remaining = end_date - now;
    if remaining <= Duration::zero() {
        return "Finished".to_string();
    }
    let days = remaining.num_days();
    let hours = remaining.num_hours() - days * 24;
    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h")
    } else {
        format!("{}m", remaining.num_minutes().max(1))
    }
}

fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}

/// Parses an `endDate` value received from the server.
///
/// Accepts RFC 3339 timestamps, naive date-times (read as local time) and
/// bare `YYYY-MM-DD` dates (local midnight).
pub fn parse_end_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return local_to_utc(naive);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(local_midnight)
}

/// Parses a due date typed by the user.
///
/// Besides `YYYY-MM-DD`, understands the quick picks offered by the date
/// picker: `today`, `tomorrow`, `week`, and day offsets such as `3d` or
/// `in 3 days`. Offsets keep the current time of day.
pub fn parse_due(input: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let input = input.trim().to_lowercase();
    let offset_days = match input.as_str() {
        "today" => Some(0),
        "tomorrow" => Some(1),
        "week" | "in a week" => Some(7),
        other => parse_day_offset(other),
    };
    if let Some(days) = offset_days {
        return Duration::try_days(days).and_then(|d| now.checked_add_signed(d));
    }
    NaiveDate::parse_from_str(&input, "%Y-%m-%d")
        .ok()
        .and_then(local_midnight)
}

fn parse_day_offset(input: &str) -> Option<i64> {
    let digits = if let Some(rest) = input.strip_prefix("in ") {
        rest.strip_suffix(" days")
            .or_else(|| rest.strip_suffix(" day"))?
    } else {
        input.strip_suffix('d')?
    };
    digits.trim().parse::<i64>().ok().filter(|d| *d >= 0)
}

fn local_midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    local_to_utc(date.and_hms_opt(0, 0, 0)?)
}

fn local_to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `endDate` as it travels over the wire: RFC 3339 with milliseconds going
/// out, any of the formats [`parse_end_date`] understands coming in.
mod wire_date {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_end_date(&raw)
            .ok_or_else(|| de::Error::custom(format!("unrecognized endDate '{raw}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(22), "22nd");
        assert_eq!(ordinal(31), "31st");
    }

    #[test]
    fn day_offsets() {
        assert_eq!(parse_day_offset("3d"), Some(3));
        assert_eq!(parse_day_offset("in 10 days"), Some(10));
        assert_eq!(parse_day_offset("in 1 day"), Some(1));
        assert_eq!(parse_day_offset("-2d"), None);
        assert_eq!(parse_day_offset("soon"), None);
    }
}
