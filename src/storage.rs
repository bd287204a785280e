use crate::errors::AppError;
use crate::models::{Activity, AppData};
use std::{collections::BTreeMap, path::Path};
use tokio::fs;
use tracing::{error, warn};

pub const ACTIVITIES_KEY: &str = "fit_track_activities";
pub const INSIGHT_KEY: &str = "fit_track_last_insight";

type Entries = BTreeMap<String, String>;

pub async fn load_data(path: &Path) -> AppData {
    let entries = read_entries(path).await;

    let activities = match entries.get(ACTIVITIES_KEY) {
        Some(raw) => match serde_json::from_str::<Vec<Activity>>(raw) {
            Ok(activities) => activities,
            Err(err) => {
                error!("failed to parse stored activities: {err}");
                Vec::new()
            }
        },
        None => Vec::new(),
    };
    let last_insight = entries.get(INSIGHT_KEY).cloned().unwrap_or_default();

    AppData {
        activities,
        last_insight,
    }
}

async fn read_entries(path: &Path) -> Entries {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(err) => {
                error!("failed to parse data file: {err}");
                Entries::new()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Entries::new(),
        Err(err) => {
            error!("failed to read data file: {err}");
            Entries::new()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let mut entries = Entries::new();
    entries.insert(
        ACTIVITIES_KEY.to_string(),
        serde_json::to_string(&data.activities)?,
    );
    entries.insert(INSIGHT_KEY.to_string(), data.last_insight.clone());

    let payload = serde_json::to_vec_pretty(&entries)?;
    if let Err(err) = fs::write(path, payload).await {
        warn!(path = %path.display(), "failed to write data file");
        return Err(err.into());
    }
    Ok(())
}
