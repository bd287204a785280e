use crate::models::Activity;
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;

/// Labels shown inside one day cell before the "+N" indicator.
pub const LABELS_PER_DAY: usize = 2;

pub const WEEKDAY_HEADERS: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];

const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub activities: Vec<Activity>,
}

impl CalendarDay {
    pub fn labels(&self) -> Vec<&'static str> {
        self.activities
            .iter()
            .take(LABELS_PER_DAY)
            .map(|activity| activity.activity_type.label())
            .collect()
    }

    /// Activities hidden behind the "+N mais" indicator.
    pub fn overflow(&self) -> usize {
        self.activities.len().saturating_sub(LABELS_PER_DAY)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthGrid {
    pub title: String,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    /// Empty cells before `first_day` in a Sunday-first week.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

pub fn month_bounds(reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = reference.with_day(1).unwrap_or(reference);
    let last = first
        .checked_add_months(Months::new(1))
        .map(|next| next - Duration::days(1))
        .unwrap_or(first);
    (first, last)
}

pub fn activities_for_day<'a>(
    activities: &'a [Activity],
    day: NaiveDate,
) -> impl Iterator<Item = &'a Activity> + 'a {
    activities.iter().filter(move |activity| activity.date == day)
}

pub fn build_month_grid(reference: NaiveDate, activities: &[Activity]) -> MonthGrid {
    let (first_day, last_day) = month_bounds(reference);

    let days = first_day
        .iter_days()
        .take_while(|day| *day <= last_day)
        .map(|date| CalendarDay {
            date,
            activities: activities_for_day(activities, date).cloned().collect(),
        })
        .collect();

    MonthGrid {
        title: month_title(first_day),
        first_day,
        last_day,
        leading_blanks: first_day.weekday().num_days_from_sunday(),
        days,
    }
}

pub fn next_month(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(1)).unwrap_or(date)
}

pub fn prev_month(date: NaiveDate) -> NaiveDate {
    date.checked_sub_months(Months::new(1)).unwrap_or(date)
}

pub fn parse_month(value: &str) -> Option<NaiveDate> {
    let (year, month) = value.trim().split_once('-')?;
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

pub fn month_title(date: NaiveDate) -> String {
    format!("{} {}", MONTH_NAMES[date.month0() as usize], date.year())
}
