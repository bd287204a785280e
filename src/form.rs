use crate::models::{ActivityInput, ActivityType, NewActivity};
use chrono::NaiveDate;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormRejection {
    #[error("duration is required")]
    MissingDuration,
    #[error("duration must be a whole number of minutes")]
    InvalidDuration,
    #[error("date must be formatted as YYYY-MM-DD")]
    InvalidDate,
}

/// Type and date survive a submission; the other fields are cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityForm {
    pub activity_type: ActivityType,
    pub date: String,
    pub duration: String,
    pub distance: String,
    pub notes: String,
}

impl ActivityForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            activity_type: ActivityType::default(),
            date: today.format("%Y-%m-%d").to_string(),
            duration: String::new(),
            distance: String::new(),
            notes: String::new(),
        }
    }

    pub fn apply(&mut self, input: ActivityInput) {
        if let Some(activity_type) = input.activity_type {
            self.activity_type = activity_type;
        }
        if let Some(date) = input.date {
            self.date = date;
        }
        if let Some(duration) = input.duration {
            self.duration = duration;
        }
        if let Some(distance) = input.distance {
            self.distance = distance;
        }
        if let Some(notes) = input.notes {
            self.notes = notes;
        }
    }

    pub fn submit(&mut self) -> Result<NewActivity, FormRejection> {
        let duration = self.duration.trim();
        if duration.is_empty() {
            return Err(FormRejection::MissingDuration);
        }
        let duration = duration
            .parse::<u32>()
            .map_err(|_| FormRejection::InvalidDuration)?;
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| FormRejection::InvalidDate)?;

        let activity = NewActivity {
            activity_type: self.activity_type,
            duration,
            distance: parse_distance(&self.distance),
            date,
            notes: Some(self.notes.clone()),
        };

        self.duration.clear();
        self.distance.clear();
        self.notes.clear();

        Ok(activity)
    }
}

fn parse_distance(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            warn!("ignoring unparseable distance {raw:?}");
            None
        }
    }
}
