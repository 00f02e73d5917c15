use chrono::{Local, NaiveDate};
use crate::models::Task;

/// Today's calendar day in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Decides whether daily tasks must be unflagged for `today`.
///
/// Returns the cleared collection when the stored marker is absent or names
/// another day, and `None` when the collection is already current.
pub fn daily_reset(daily: &[Task], last_reset: Option<NaiveDate>, today: NaiveDate) -> Option<Vec<Task>> {
    if last_reset == Some(today) {
        return None;
    }
    Some(
        daily
            .iter()
            .map(|t| Task { completed: false, ..t.clone() })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn daily(id: &str, completed: bool) -> Task {
        Task {
            id: id.into(),
            title: id.into(),
            is_daily: true,
            completed,
            created_at: String::new(),
            notification_time: None,
        }
    }

    #[test]
    fn clears_flags_on_new_day() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let out = daily_reset(&[daily("a", true), daily("b", false)], Some(today - Duration::days(1)), today).unwrap();
        assert!(out.iter().all(|t| !t.completed));
        assert_eq!(out[0].id, "a");
        assert_eq!(out[1].id, "b");
    }

    #[test]
    fn absent_marker_triggers_reset() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert!(daily_reset(&[daily("a", true)], None, today).is_some());
    }

    #[test]
    fn same_day_is_noop() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert!(daily_reset(&[daily("a", true)], Some(today), today).is_none());
    }
}
