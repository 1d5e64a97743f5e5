use chrono::NaiveDate;

use crate::models::Card;

/// Cards due within this many days (exclusive) count as due soon
pub const DUE_SOON_DAYS: i64 = 7;

/// Due-date classification shown on card rows.
///
/// Precedence: complete, overdue, due today, due soon, nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    Complete,
    Overdue,
    DueToday,
    DueSoon,
    None,
}

impl DueStatus {
    pub fn classify(due: Option<NaiveDate>, complete: bool, today: NaiveDate) -> Self {
        if complete {
            return DueStatus::Complete;
        }
        let Some(due) = due else {
            return DueStatus::None;
        };

        let days = (due - today).num_days();
        if days < 0 {
            DueStatus::Overdue
        } else if days == 0 {
            DueStatus::DueToday
        } else if days < DUE_SOON_DAYS {
            DueStatus::DueSoon
        } else {
            DueStatus::None
        }
    }

    pub fn of(card: &Card, today: NaiveDate) -> Self {
        Self::classify(card.due_date(), card.due_complete, today)
    }

    pub fn tag(self) -> Option<&'static str> {
        match self {
            DueStatus::Complete => Some("complete"),
            DueStatus::Overdue => Some("overdue"),
            DueStatus::DueToday => Some("due today"),
            DueStatus::DueSoon => Some("due soon"),
            DueStatus::None => None,
        }
    }
}

/// A card whose checklists exist and are all ticked off
pub fn fully_checked(card: &Card) -> bool {
    card.checklist_total() > 0 && card.checklist_completed() >= card.checklist_total()
}

#[cfg(test)]
mod tests {
    use chrono::Days;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn days_from_today(days: i64) -> Option<NaiveDate> {
        Some(today() + chrono::Duration::days(days))
    }

    #[test]
    fn test_complete_wins_regardless_of_due() {
        for offset in [-30, -1, 0, 3, 30] {
            assert_eq!(
                DueStatus::classify(days_from_today(offset), true, today()),
                DueStatus::Complete
            );
        }
        assert_eq!(DueStatus::classify(None, true, today()), DueStatus::Complete);
    }

    #[test]
    fn test_no_due_date_is_unclassified() {
        assert_eq!(DueStatus::classify(None, false, today()), DueStatus::None);
    }

    #[test]
    fn test_overdue() {
        assert_eq!(DueStatus::classify(days_from_today(-1), false, today()), DueStatus::Overdue);
    }

    #[test]
    fn test_due_today() {
        assert_eq!(DueStatus::classify(days_from_today(0), false, today()), DueStatus::DueToday);
    }

    #[test]
    fn test_due_soon_window() {
        assert_eq!(DueStatus::classify(days_from_today(1), false, today()), DueStatus::DueSoon);
        assert_eq!(DueStatus::classify(days_from_today(3), false, today()), DueStatus::DueSoon);
        assert_eq!(DueStatus::classify(days_from_today(6), false, today()), DueStatus::DueSoon);
        assert_eq!(DueStatus::classify(days_from_today(7), false, today()), DueStatus::None);
    }

    #[test]
    fn test_month_boundary() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let due = today.checked_add_days(Days::new(2));
        assert_eq!(DueStatus::classify(due, false, today), DueStatus::DueSoon);
    }

    #[test]
    fn test_fully_checked() {
        let mut card: Card = serde_json::from_str(r#"{"id":"1","name":"n","url":"u"}"#).unwrap();
        assert!(!fully_checked(&card), "no checklist");

        card.badges.check_items = 2;
        card.badges.check_items_checked = 1;
        assert!(!fully_checked(&card));

        card.badges.check_items_checked = 2;
        assert!(fully_checked(&card));
    }

    #[test]
    fn test_tags() {
        assert_eq!(DueStatus::Overdue.tag(), Some("overdue"));
        assert_eq!(DueStatus::None.tag(), None);
    }
}
