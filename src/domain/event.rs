//! Event domain entity, creation input and query filter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::types::Pagination;

/// Event domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    pub id: Uuid,
    #[schema(example = "Jazz in the Park")]
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    #[schema(example = 52.2297)]
    pub latitude: f64,
    #[schema(example = 21.0122)]
    pub longitude: f64,
    #[schema(example = 15.0)]
    pub fee: f64,
    pub organizer_id: Uuid,
    /// Tag names, sorted
    pub tags: Vec<String>,
}

/// Everything needed to create an event, before an id and organizer are assigned.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub fee: f64,
    pub tags: Vec<String>,
}

impl NewEvent {
    /// Validate and attach identity. Tag names are trimmed and de-duplicated.
    pub fn into_event(self, organizer_id: Uuid) -> AppResult<Event> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Event name is required"));
        }
        if !self.fee.is_finite() || self.fee < 0.0 {
            return Err(AppError::validation("Fee must be a non-negative amount"));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(AppError::validation("Latitude must be between -90 and 90"));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(AppError::validation("Longitude must be between -180 and 180"));
        }

        Ok(Event {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: self.description.trim().to_string(),
            date: self.date,
            latitude: self.latitude,
            longitude: self.longitude,
            fee: self.fee,
            organizer_id,
            tags: normalize_tag_names(self.tags),
        })
    }
}

/// Trim, drop blanks and collapse duplicates, keeping first-seen order.
pub fn normalize_tag_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        if !name.is_empty() && !out.iter().any(|seen| seen == name) {
            out.push(name.to_string());
        }
    }
    out
}

/// Ad-hoc event query. Every field is optional; absent fields add no predicate.
///
/// Bounds are inclusive. `tags` matches events carrying any of the names.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub min_fee: Option<f64>,
    pub max_fee: Option<f64>,
    pub tags: Vec<String>,
    pub pagination: Option<Pagination>,
}

impl EventFilter {
    /// Tag-only filter.
    pub fn by_tags<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tags: normalize_tag_names(names),
            ..Self::default()
        }
    }

    /// True when at least one row predicate is set. Pagination alone does not count.
    pub fn has_predicates(&self) -> bool {
        self.date_from.is_some()
            || self.date_to.is_some()
            || self.min_fee.is_some()
            || self.max_fee.is_some()
            || !self.tags.is_empty()
    }
}
