use crate::form::ActivityForm;
use crate::insight::TextGenerator;
use crate::models::{AppData, Tab};
use chrono::NaiveDate;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Per-session view state; not persisted.
#[derive(Debug, Clone)]
pub struct UiState {
    pub active_tab: Tab,
    pub form: ActivityForm,
    /// Any day inside the month the calendar shows.
    pub calendar_month: NaiveDate,
    pub insight_loading: bool,
}

impl UiState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            active_tab: Tab::Calendar,
            form: ActivityForm::new(today),
            calendar_month: today,
            insight_loading: false,
        }
    }

    /// Opening a tab starts it fresh: a blank form, or the current month.
    pub fn show(&mut self, tab: Tab, today: NaiveDate) {
        match tab {
            Tab::Form if self.active_tab != Tab::Form => self.form = ActivityForm::new(today),
            Tab::Calendar if self.active_tab != Tab::Calendar => self.calendar_month = today,
            _ => {}
        }
        self.active_tab = tab;
    }
}

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub ui: Arc<Mutex<UiState>>,
    pub insight: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(
        data_path: PathBuf,
        data: AppData,
        today: NaiveDate,
        insight: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            ui: Arc::new(Mutex::new(UiState::new(today))),
            insight,
        }
    }
}
