use crate::models::Activity;
use async_trait::async_trait;
use tracing::{debug, error};

pub const PROMPT_WINDOW: usize = 7;

pub const STARTER_MESSAGE: &str =
    "Comece a registrar suas atividades para receber insights personalizados!";
pub const EMPTY_REPLY_MESSAGE: &str = "Continue se movendo! Você está indo muito bem.";
pub const FAILURE_MESSAGE: &str = "Mantenha o foco nos seus objetivos de saúde!";

#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the generated text, or `None` when the reply carried none.
    async fn generate(&self, prompt: &str) -> Result<Option<String>, InsightError>;
}

pub fn build_prompt(activities: &[Activity]) -> Option<String> {
    if activities.is_empty() {
        return None;
    }

    let start = activities.len().saturating_sub(PROMPT_WINDOW);
    let summary = activities[start..]
        .iter()
        .map(summary_line)
        .collect::<Vec<_>>()
        .join("\n");

    Some(format!(
        "Com base nas minhas últimas atividades físicas:\n{summary}\n\n\
         Dê-me um feedback motivacional curto e uma dica de saúde baseada nesses dados. \
         Seja breve e encorajador em Português do Brasil."
    ))
}

fn summary_line(activity: &Activity) -> String {
    let distance = match activity.distance {
        Some(km) if km != 0.0 => format!(", {km}km"),
        _ => String::new(),
    };
    format!(
        "- {}: {} ({} min{distance})",
        activity.date,
        activity.activity_type.label(),
        activity.duration
    )
}

pub async fn get_health_insights(generator: &dyn TextGenerator, activities: &[Activity]) -> String {
    let Some(prompt) = build_prompt(activities) else {
        return STARTER_MESSAGE.to_string();
    };

    match generator.generate(&prompt).await {
        Ok(Some(text)) if !text.trim().is_empty() => text,
        Ok(_) => {
            debug!("insight reply was empty");
            EMPTY_REPLY_MESSAGE.to_string()
        }
        Err(err) => {
            error!("insight request failed: {err}");
            FAILURE_MESSAGE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityType;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    enum Reply {
        Text(&'static str),
        Empty,
        Fail,
    }

    struct StubGenerator {
        reply: Reply,
        prompts: Mutex<Vec<String>>,
    }

    impl StubGenerator {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, prompt: &str) -> Result<Option<String>, InsightError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.reply {
                Reply::Text(text) => Ok(Some(text.to_string())),
                Reply::Empty => Ok(None),
                Reply::Fail => Err(InsightError::Api {
                    status: 403,
                    message: "API key not valid".to_string(),
                }),
            }
        }
    }

    fn activity(day: u32, activity_type: ActivityType, distance: Option<f64>) -> Activity {
        Activity {
            id: format!("id-{day}"),
            activity_type,
            duration: 30,
            distance,
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            notes: Some("ignored".to_string()),
        }
    }

    #[test]
    fn prompt_lists_last_seven_in_insertion_order() {
        let activities: Vec<Activity> = (1..=9)
            .map(|day| activity(day, ActivityType::Walk, None))
            .collect();

        let prompt = build_prompt(&activities).unwrap();
        assert!(!prompt.contains("2024-03-02"));
        assert!(prompt.contains("- 2024-03-03: Caminhada (30 min)"));
        assert!(prompt.contains("- 2024-03-09: Caminhada (30 min)"));
        assert_eq!(prompt.matches("\n- ").count(), PROMPT_WINDOW);
        assert!(prompt.contains("Português do Brasil"));
    }

    #[test]
    fn prompt_includes_distance_only_when_present() {
        let activities = vec![
            activity(1, ActivityType::Run, Some(5.0)),
            activity(2, ActivityType::Cycling, Some(12.5)),
            activity(3, ActivityType::Gym, None),
        ];

        let prompt = build_prompt(&activities).unwrap();
        assert!(prompt.contains("- 2024-03-01: Corrida (30 min, 5km)"));
        assert!(prompt.contains("- 2024-03-02: Ciclismo (30 min, 12.5km)"));
        assert!(prompt.contains("- 2024-03-03: Academia (30 min)"));
    }

    #[tokio::test]
    async fn empty_log_skips_the_generator() {
        let stub = StubGenerator::new(Reply::Text("unused"));
        let text = get_health_insights(&stub, &[]).await;
        assert_eq!(text, STARTER_MESSAGE);
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn generated_text_is_returned() {
        let stub = StubGenerator::new(Reply::Text("Ótima semana!"));
        let activities = vec![activity(1, ActivityType::Run, Some(5.0))];
        let text = get_health_insights(&stub, &activities).await;
        assert_eq!(text, "Ótima semana!");
        assert_eq!(stub.calls().len(), 1);
    }

    #[tokio::test]
    async fn empty_reply_uses_generic_message() {
        let stub = StubGenerator::new(Reply::Empty);
        let activities = vec![activity(1, ActivityType::Run, None)];
        assert_eq!(
            get_health_insights(&stub, &activities).await,
            EMPTY_REPLY_MESSAGE
        );
    }

    #[tokio::test]
    async fn failure_uses_fallback_message() {
        let stub = StubGenerator::new(Reply::Fail);
        let activities = vec![activity(1, ActivityType::Run, None)];
        assert_eq!(get_health_insights(&stub, &activities).await, FAILURE_MESSAGE);
    }
}
