use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// How many entries the recent history list shows.
pub const RECENT_HISTORY_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ActivityType {
    #[default]
    #[serde(alias = "Caminhada")]
    Walk,
    #[serde(alias = "Corrida")]
    Run,
    #[serde(alias = "Ciclismo")]
    Cycling,
    #[serde(alias = "Academia")]
    Gym,
    #[serde(alias = "Outro")]
    Other,
}

impl ActivityType {
    pub const ALL: [ActivityType; 5] = [
        ActivityType::Walk,
        ActivityType::Run,
        ActivityType::Cycling,
        ActivityType::Gym,
        ActivityType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::Walk => "Walk",
            ActivityType::Run => "Run",
            ActivityType::Cycling => "Cycling",
            ActivityType::Gym => "Gym",
            ActivityType::Other => "Other",
        }
    }

    /// Label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            ActivityType::Walk => "Caminhada",
            ActivityType::Run => "Corrida",
            ActivityType::Cycling => "Ciclismo",
            ActivityType::Gym => "Academia",
            ActivityType::Other => "Outro",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Minutes.
    pub duration: u32,
    /// Kilometers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// An activity as emitted by the form, before an id is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub activity_type: ActivityType,
    pub duration: u32,
    pub distance: Option<f64>,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

impl NewActivity {
    fn with_id(self, id: String) -> Activity {
        Activity {
            id,
            activity_type: self.activity_type,
            duration: self.duration,
            distance: self.distance,
            date: self.date,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppData {
    pub activities: Vec<Activity>,
    pub last_insight: String,
}

impl AppData {
    pub fn add_activity(&mut self, activity: NewActivity) -> Activity {
        let mut id = new_activity_id();
        while self.activities.iter().any(|existing| existing.id == id) {
            id = new_activity_id();
        }

        let stored = activity.with_id(id);
        self.activities.push(stored.clone());
        stored
    }

    pub fn remove_activity(&mut self, id: &str) -> bool {
        let before = self.activities.len();
        self.activities.retain(|activity| activity.id != id);
        self.activities.len() != before
    }

    /// Most recently added first, capped at [`RECENT_HISTORY_LEN`].
    pub fn recent_activities(&self) -> Vec<Activity> {
        self.activities
            .iter()
            .rev()
            .take(RECENT_HISTORY_LEN)
            .cloned()
            .collect()
    }
}

fn new_activity_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Calendar,
    Form,
}

impl Tab {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "calendar" => Some(Tab::Calendar),
            "form" => Some(Tab::Form),
            _ => None,
        }
    }
}

/// Fields of the activity form; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityInput {
    #[serde(rename = "type", default)]
    pub activity_type: Option<ActivityType>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub distance: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    /// `YYYY-MM`.
    pub month: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub count: usize,
    pub total_duration: u64,
    pub total_distance: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InsightResponse {
    pub insight: String,
    pub loading: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_run(day: u32) -> NewActivity {
        NewActivity {
            activity_type: ActivityType::Run,
            duration: 30,
            distance: Some(5.0),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn add_assigns_distinct_ids() {
        let mut data = AppData::default();
        let first = data.add_activity(new_run(1));
        let second = data.add_activity(new_run(1));

        assert_ne!(first.id, second.id);
        assert!(!first.id.is_empty());
        assert_eq!(data.activities.len(), 2);
    }

    #[test]
    fn remove_deletes_only_the_matching_entry() {
        let mut data = AppData::default();
        let keep = data.add_activity(new_run(1));
        let drop = data.add_activity(new_run(2));

        assert!(data.remove_activity(&drop.id));
        assert_eq!(data.activities, vec![keep]);
        assert!(!data.remove_activity(&drop.id));
    }

    #[test]
    fn recent_is_reverse_insertion_capped() {
        let mut data = AppData::default();
        for day in 1..=12 {
            data.add_activity(new_run(day));
        }

        let recent = data.recent_activities();
        assert_eq!(recent.len(), RECENT_HISTORY_LEN);
        assert_eq!(recent[0].date.to_string(), "2024-03-12");
        assert_eq!(recent[9].date.to_string(), "2024-03-03");
    }

    #[test]
    fn activity_json_accepts_portuguese_type_labels() {
        let raw = r#"{"id":"abc","type":"Corrida","duration":20,"date":"2024-03-10"}"#;
        let activity: Activity = serde_json::from_str(raw).unwrap();
        assert_eq!(activity.activity_type, ActivityType::Run);
        assert_eq!(activity.distance, None);

        let encoded = serde_json::to_value(&activity).unwrap();
        assert_eq!(encoded["type"], "Run");
        assert!(encoded.get("distance").is_none());
    }
}
