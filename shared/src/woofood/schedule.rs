use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Orders due within this window after creation are urgent
const URGENT_WINDOW_HOURS: i64 = 2;

/// When an order is due, relative to when it was placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleStatus {
    /// Due within two hours of creation (or already overdue)
    Urgent,
    /// Due later on the day it was placed
    Today,
    /// Due on a later day
    PreOrder { days_ahead: i64 },
    /// Date or window start missing
    Unknown,
}

impl ScheduleStatus {
    pub fn is_pre_order(&self) -> bool {
        matches!(self, ScheduleStatus::PreOrder { .. })
    }
}

/// Classify an order by its due date and window start; both are needed
pub fn schedule_status(
    created_at: NaiveDateTime,
    date: Option<NaiveDate>,
    start: Option<NaiveTime>,
) -> ScheduleStatus {
    let (Some(date), Some(start)) = (date, start) else {
        return ScheduleStatus::Unknown;
    };

    if date.and_time(start) - created_at < Duration::hours(URGENT_WINDOW_HOURS) {
        return ScheduleStatus::Urgent;
    }
    match (date - created_at.date()).num_days() {
        0 => ScheduleStatus::Today,
        d => ScheduleStatus::PreOrder { days_ahead: d },
    }
}

/// Human label for a day offset
pub fn relative_day_label(days_ahead: i64) -> String {
    match days_ahead {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        2 => "Day after tomorrow".to_string(),
        d if d > 2 => format!("In {} days", d),
        d => format!("{} days ago", -d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn day(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 5, d)
    }

    fn time(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    #[test]
    fn test_urgent_within_two_hours() {
        assert_eq!(schedule_status(at(1, 12, 0), day(1), time(13, 30)), ScheduleStatus::Urgent);
        assert_eq!(schedule_status(at(1, 12, 0), day(1), time(11, 0)), ScheduleStatus::Urgent);
    }

    #[test]
    fn test_later_today() {
        assert_eq!(schedule_status(at(1, 12, 0), day(1), time(18, 0)), ScheduleStatus::Today);
    }

    #[test]
    fn test_pre_order() {
        assert_eq!(
            schedule_status(at(1, 12, 0), day(3), time(12, 0)),
            ScheduleStatus::PreOrder { days_ahead: 2 }
        );
        // Just after midnight but less than two hours away stays urgent
        assert_eq!(schedule_status(at(1, 23, 30), day(2), time(0, 30)), ScheduleStatus::Urgent);
    }

    #[test]
    fn test_unknown_and_past() {
        assert_eq!(schedule_status(at(1, 12, 0), None, time(12, 0)), ScheduleStatus::Unknown);
        assert_eq!(schedule_status(at(1, 12, 0), day(1), None), ScheduleStatus::Unknown);
        assert_eq!(schedule_status(at(1, 12, 0), day(3), None), ScheduleStatus::Unknown);
        assert_eq!(schedule_status(at(5, 12, 0), day(1), time(12, 0)), ScheduleStatus::Urgent);
    }

    #[test]
    fn test_relative_labels() {
        assert_eq!(relative_day_label(0), "Today");
        assert_eq!(relative_day_label(1), "Tomorrow");
        assert_eq!(relative_day_label(2), "Day after tomorrow");
        assert_eq!(relative_day_label(5), "In 5 days");
    }
}
