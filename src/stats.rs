use crate::models::{Activity, StatsResponse};

pub fn build_stats(activities: &[Activity]) -> StatsResponse {
    StatsResponse {
        count: activities.len(),
        total_duration: activities
            .iter()
            .map(|activity| u64::from(activity.duration))
            .sum(),
        total_distance: activities
            .iter()
            .map(|activity| activity.distance.unwrap_or(0.0))
            .sum(),
    }
}
