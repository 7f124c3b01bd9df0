//! Due-date computation for recurring transactions.
//!
//! Occurrence dates are a pure function of the schedule and the number of
//! occurrences already generated: the n-th occurrence is the first
//! scheduled date on or after `start_date`, advanced n periods. Target
//! days that overshoot a month (the 31st in April) clamp to the month's
//! last day.

use chrono::{Datelike, Days, NaiveDate};

use super::types::{Frequency, RecurringTransaction};

/// The next date this schedule should generate a voucher on, or `None`
/// when the schedule is exhausted by `end_date` or `occurrences`.
#[must_use]
pub fn next_due_date(recurring: &RecurringTransaction) -> Option<NaiveDate> {
    if let Some(max) = recurring.occurrences {
        if recurring.occurrences_generated >= max {
            return None;
        }
    }
    let date = occurrence_date(recurring, recurring.occurrences_generated.max(0));
    if let Some(end) = recurring.end_date {
        if date > end {
            return None;
        }
    }
    Some(date)
}

/// True when the schedule is active and its next due date has arrived.
#[must_use]
pub fn is_due(recurring: &RecurringTransaction, today: NaiveDate) -> bool {
    recurring.is_active && next_due_date(recurring).is_some_and(|date| date <= today)
}

/// The date of the n-th occurrence (0-based).
#[must_use]
pub fn occurrence_date(recurring: &RecurringTransaction, n: i32) -> NaiveDate {
    let mut date = first_occurrence(recurring);
    for _ in 0..n {
        date = advance(recurring, date);
    }
    date
}

/// The first scheduled date on or after `start_date`.
fn first_occurrence(recurring: &RecurringTransaction) -> NaiveDate {
    let start = recurring.start_date;
    match recurring.frequency {
        Frequency::Daily => start,
        Frequency::Weekly => {
            let target = recurring
                .day_of_week
                .unwrap_or_else(|| start.weekday().number_from_monday());
            let mut date = start;
            for _ in 0..7 {
                if date.weekday().number_from_monday() == target {
                    return date;
                }
                date = date + Days::new(1);
            }
            start
        }
        Frequency::Monthly | Frequency::Quarterly => {
            let day = recurring.day_of_month.unwrap_or_else(|| start.day());
            let candidate = clamped_date(start.year(), start.month(), day);
            if candidate >= start {
                candidate
            } else {
                let (year, month) = add_months(start.year(), start.month(), 1);
                clamped_date(year, month, day)
            }
        }
        Frequency::Yearly => {
            let month = recurring.month.unwrap_or_else(|| start.month()).clamp(1, 12);
            let day = recurring.day_of_month.unwrap_or_else(|| start.day());
            let candidate = clamped_date(start.year(), month, day);
            if candidate >= start {
                candidate
            } else {
                clamped_date(start.year() + 1, month, day)
            }
        }
    }
}

/// The occurrence following `date`.
fn advance(recurring: &RecurringTransaction, date: NaiveDate) -> NaiveDate {
    match recurring.frequency {
        Frequency::Daily => date + Days::new(1),
        Frequency::Weekly => date + Days::new(7),
        Frequency::Monthly => step_months(recurring, date, 1),
        Frequency::Quarterly => step_months(recurring, date, 3),
        Frequency::Yearly => {
            let day = recurring.day_of_month.unwrap_or_else(|| date.day());
            clamped_date(date.year() + 1, date.month(), day)
        }
    }
}

/// Steps forward by whole months, re-targeting the schedule's day so a
/// clamped February date springs back to the 31st in longer months.
fn step_months(recurring: &RecurringTransaction, date: NaiveDate, months: u32) -> NaiveDate {
    let day = recurring.day_of_month.unwrap_or_else(|| date.day());
    let (year, month) = add_months(date.year(), date.month(), months);
    clamped_date(year, month, day)
}

fn add_months(year: i32, month: u32, delta: u32) -> (i32, u32) {
    let zero_based = month - 1 + delta;
    (
        year + i32::try_from(zero_based / 12).unwrap_or(0),
        zero_based % 12 + 1,
    )
}

/// The given day in the given month, clamped to the month's last valid
/// day.
fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let mut candidate = day.min(31).max(1);
    loop {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, candidate) {
            return date;
        }
        candidate -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kontu_shared::types::{BusinessId, RecurringTransactionId, VoucherTypeId};

    fn schedule(frequency: Frequency, start: (i32, u32, u32)) -> RecurringTransaction {
        RecurringTransaction {
            id: RecurringTransactionId::new(),
            business_id: BusinessId::new(),
            voucher_type_id: VoucherTypeId::new(),
            name: "Office rent".to_string(),
            frequency,
            day_of_month: None,
            day_of_week: None,
            month: None,
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: None,
            occurrences: None,
            occurrences_generated: 0,
            narration: None,
            template: vec![],
            is_active: true,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_advances_one_day() {
        let mut rt = schedule(Frequency::Daily, (2025, 3, 1));
        assert_eq!(next_due_date(&rt), Some(date(2025, 3, 1)));
        rt.occurrences_generated = 2;
        assert_eq!(next_due_date(&rt), Some(date(2025, 3, 3)));
    }

    #[test]
    fn test_weekly_lands_on_requested_weekday() {
        let mut rt = schedule(Frequency::Weekly, (2025, 3, 5)); // a Wednesday
        rt.day_of_week = Some(5); // Friday
        assert_eq!(next_due_date(&rt), Some(date(2025, 3, 7)));
        rt.occurrences_generated = 1;
        assert_eq!(next_due_date(&rt), Some(date(2025, 3, 14)));
    }

    #[test]
    fn test_monthly_clamps_short_months() {
        let mut rt = schedule(Frequency::Monthly, (2025, 1, 31));
        rt.day_of_month = Some(31);
        assert_eq!(occurrence_date(&rt, 0), date(2025, 1, 31));
        // February clamps to the 28th, April to the 30th...
        assert_eq!(occurrence_date(&rt, 1), date(2025, 2, 28));
        assert_eq!(occurrence_date(&rt, 3), date(2025, 4, 30));
        // ...and the target day springs back where it fits.
        assert_eq!(occurrence_date(&rt, 2), date(2025, 3, 31));
    }

    #[test]
    fn test_monthly_start_after_target_day_skips_to_next_month() {
        let mut rt = schedule(Frequency::Monthly, (2025, 3, 20));
        rt.day_of_month = Some(10);
        assert_eq!(occurrence_date(&rt, 0), date(2025, 4, 10));
    }

    #[test]
    fn test_quarterly_steps_three_months() {
        let mut rt = schedule(Frequency::Quarterly, (2025, 1, 15));
        rt.day_of_month = Some(15);
        assert_eq!(occurrence_date(&rt, 1), date(2025, 4, 15));
        assert_eq!(occurrence_date(&rt, 2), date(2025, 7, 15));
        assert_eq!(occurrence_date(&rt, 4), date(2026, 1, 15));
    }

    #[test]
    fn test_yearly_with_leap_day() {
        let mut rt = schedule(Frequency::Yearly, (2024, 1, 1));
        rt.month = Some(2);
        rt.day_of_month = Some(29);
        assert_eq!(occurrence_date(&rt, 0), date(2024, 2, 29));
        // 2025 has no Feb 29: clamp to the 28th.
        assert_eq!(occurrence_date(&rt, 1), date(2025, 2, 28));
    }

    #[test]
    fn test_occurrence_cap_exhausts_schedule() {
        let mut rt = schedule(Frequency::Monthly, (2025, 1, 1));
        rt.occurrences = Some(3);
        rt.occurrences_generated = 3;
        assert_eq!(next_due_date(&rt), None);
        assert!(!is_due(&rt, date(2030, 1, 1)));
    }

    #[test]
    fn test_end_date_exhausts_schedule() {
        let mut rt = schedule(Frequency::Monthly, (2025, 1, 1));
        rt.end_date = Some(date(2025, 2, 28));
        assert_eq!(next_due_date(&rt), Some(date(2025, 1, 1)));
        rt.occurrences_generated = 2; // would be March 1st
        assert_eq!(next_due_date(&rt), None);
    }

    #[test]
    fn test_is_due_semantics() {
        let mut rt = schedule(Frequency::Monthly, (2025, 5, 1));
        assert!(is_due(&rt, date(2025, 5, 1)));
        assert!(is_due(&rt, date(2025, 6, 15)));
        assert!(!is_due(&rt, date(2025, 4, 30)));

        rt.is_active = false;
        assert!(!is_due(&rt, date(2025, 5, 1)));
    }
}
