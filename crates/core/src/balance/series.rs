//! Monthly income/expense series across a financial year.

use chrono::{Datelike, NaiveDate};

use super::engine::BalanceEngine;
use super::types::{ClassifiedAccount, MonthTotal};
use crate::accounts::types::AccountNature;
use crate::fiscal::FinancialYear;
use crate::journal::JournalEntry;

/// Per-calendar-month income and expense totals across the year's date
/// range. Partial months at either boundary are clipped to the year.
#[must_use]
pub fn monthly_series(
    year: &FinancialYear,
    accounts: &[ClassifiedAccount],
    entries: &[JournalEntry],
) -> Vec<MonthTotal> {
    let mut months = Vec::new();
    let mut cursor = (year.start_date.year(), year.start_date.month());
    let last = (year.end_date.year(), year.end_date.month());

    loop {
        let month_start = NaiveDate::from_ymd_opt(cursor.0, cursor.1, 1)
            .unwrap_or(year.start_date)
            .max(year.start_date);
        let month_end = last_day_of_month(cursor.0, cursor.1).min(year.end_date);

        let income = BalanceEngine::nature_total(
            accounts,
            entries,
            AccountNature::Income,
            Some(month_start),
            month_end,
            false,
        );
        let expense = BalanceEngine::nature_total(
            accounts,
            entries,
            AccountNature::Expense,
            Some(month_start),
            month_end,
            false,
        );

        months.push(MonthTotal {
            year: cursor.0,
            month: cursor.1,
            income: income.credit - income.debit,
            expense: expense.debit - expense.credit,
        });

        if cursor == last {
            break;
        }
        cursor = next_month(cursor.0, cursor.1);
    }

    months
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next) = next_month(year, month);
    NaiveDate::from_ymd_opt(next_year, next, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kontu_shared::types::{
        AccountGroupId, BalanceSide, BusinessId, FinancialYearId, JournalEntryId, LedgerAccountId,
        VoucherId,
    };
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn classified(nature: AccountNature) -> ClassifiedAccount {
        ClassifiedAccount {
            account: crate::accounts::types::LedgerAccount {
                id: LedgerAccountId::new(),
                business_id: BusinessId::new(),
                account_group_id: AccountGroupId::new(),
                code: None,
                name: nature.to_string(),
                opening_balance: Decimal::ZERO,
                opening_balance_side: BalanceSide::Debit,
                is_bank_account: false,
                is_cash_account: false,
                is_system: false,
                is_active: true,
            },
            nature,
            affects_gross_profit: false,
        }
    }

    fn entry(
        account: &ClassifiedAccount,
        date: (i32, u32, u32),
        debit: Decimal,
        credit: Decimal,
    ) -> JournalEntry {
        JournalEntry {
            id: JournalEntryId::new(),
            business_id: account.account.business_id,
            voucher_id: VoucherId::new(),
            ledger_account_id: account.account.id,
            cost_center_id: None,
            financial_year_id: FinancialYearId::new(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            debit_amount: debit,
            credit_amount: credit,
            narration: None,
        }
    }

    fn april_year() -> FinancialYear {
        FinancialYear {
            id: FinancialYearId::new(),
            business_id: BusinessId::new(),
            name: "FY 2025-26".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            is_current: true,
            is_locked: false,
        }
    }

    #[test]
    fn test_series_covers_every_month() {
        let year = april_year();
        let months = monthly_series(&year, &[], &[]);
        assert_eq!(months.len(), 12);
        assert_eq!((months[0].year, months[0].month), (2025, 4));
        assert_eq!((months[11].year, months[11].month), (2026, 3));
    }

    #[test]
    fn test_series_buckets_by_month() {
        let year = april_year();
        let sales = classified(AccountNature::Income);
        let rent = classified(AccountNature::Expense);
        let entries = vec![
            entry(&sales, (2025, 4, 10), dec!(0), dec!(1000)),
            entry(&sales, (2025, 5, 20), dec!(0), dec!(400)),
            entry(&rent, (2025, 5, 1), dec!(250), dec!(0)),
        ];
        let accounts = vec![sales, rent];

        let months = monthly_series(&year, &accounts, &entries);
        assert_eq!(months[0].income, dec!(1000));
        assert_eq!(months[0].expense, dec!(0));
        assert_eq!(months[1].income, dec!(400));
        assert_eq!(months[1].expense, dec!(250));
        assert_eq!(months[2].income, dec!(0));
    }

    #[test]
    fn test_partial_boundary_month() {
        // A year starting mid-month only picks up entries from its start.
        let year = FinancialYear {
            start_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            ..april_year()
        };
        let sales = classified(AccountNature::Income);
        let entries = vec![
            entry(&sales, (2025, 1, 10), dec!(0), dec!(999)),
            entry(&sales, (2025, 1, 20), dec!(0), dec!(100)),
        ];
        let accounts = vec![sales];

        let months = monthly_series(&year, &accounts, &entries);
        assert_eq!(months[0].income, dec!(100));
    }

    #[test]
    fn test_income_refunds_net_against_income() {
        let year = april_year();
        let sales = classified(AccountNature::Income);
        let entries = vec![
            entry(&sales, (2025, 4, 1), dec!(0), dec!(500)),
            entry(&sales, (2025, 4, 2), dec!(120), dec!(0)),
        ];
        let accounts = vec![sales];

        let months = monthly_series(&year, &accounts, &entries);
        assert_eq!(months[0].income, dec!(380));
    }
}
