use crate::schema;
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invitee {
    pub token: String,
    pub title: String,
    pub name: String,
    pub surname: String,
}

impl Invitee {
    pub fn from_row(row: &[String]) -> Self {
        let cell = |index: usize| row.get(index).cloned().unwrap_or_default();
        Invitee {
            token: cell(schema::TOKEN),
            title: cell(schema::TITLE),
            name: cell(schema::NAME),
            surname: cell(schema::SURNAME),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpStatus {
    Attending,
    Declined,
}

impl RsvpStatus {
    pub fn from_answer(answer: Option<&str>) -> Self {
        match answer {
            Some("yes") => RsvpStatus::Attending,
            _ => RsvpStatus::Declined,
        }
    }

    /// The text written into the status column.
    pub fn label(&self) -> &'static str {
        match self {
            RsvpStatus::Attending => "TAK",
            RsvpStatus::Declined => "NIE BĘDĘ",
        }
    }
}

#[derive(Debug, FromForm)]
pub struct Rsvp {
    pub status: Option<String>,
    pub comment: Option<String>,
}

/// JSON request body. Fields may hold any JSON value: only the string `"yes"`
/// accepts, and a non-string comment is stored as its JSON text.
#[derive(Debug, Deserialize)]
pub struct RsvpJson {
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub comment: Option<Value>,
}

fn value_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

impl From<RsvpJson> for Rsvp {
    fn from(body: RsvpJson) -> Self {
        let status = match body.status {
            Some(Value::String(answer)) => Some(answer),
            // Only a string can say "yes"; anything else declines.
            _ => None,
        };

        Rsvp {
            status,
            comment: body.comment.and_then(value_text),
        }
    }
}

impl Rsvp {
    pub fn status(&self) -> RsvpStatus {
        RsvpStatus::from_answer(self.status.as_deref())
    }

    pub fn comment(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRsvp {
    pub row: usize,
    pub status: RsvpStatus,
    pub comment: String,
    pub submitted_at: String,
}

/// Formats a submission time the way `pl-PL` locales print it: `5.01.2026, 09:03:05`.
pub fn format_timestamp<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.format("%-d.%m.%Y, %H:%M:%S").to_string()
}
