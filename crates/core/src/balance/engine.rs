//! Account balance and aggregation calculations.
//!
//! The sign convention, applied uniformly everywhere a balance is reported:
//! debit-normal natures (assets, expense) net as debit minus credit,
//! credit-normal natures (liabilities, income, equity) as credit minus
//! debit. A negative net flips to the opposite side. Opening balances fold
//! into the running totals *before* sign resolution, as if they were
//! journal entries dated before the start of the query window.

use std::collections::HashMap;

use chrono::NaiveDate;
use kontu_shared::types::{AccountGroupId, Balance, BalanceSide};
use rust_decimal::Decimal;

use super::types::{
    ClassifiedAccount, NatureTotals, TrialBalanceGroupTotal, TrialBalanceReport, TrialBalanceRow,
};
use crate::accounts::types::{AccountNature, LedgerAccount};
use crate::journal::JournalEntry;

/// Stateless balance computations over journal entries.
pub struct BalanceEngine;

impl BalanceEngine {
    /// Resolves raw debit/credit totals into a signed balance for the
    /// given nature.
    #[must_use]
    pub fn resolve(nature: AccountNature, total_debit: Decimal, total_credit: Decimal) -> Balance {
        let normal_side = nature.normal_side();
        let net = match normal_side {
            BalanceSide::Debit => total_debit - total_credit,
            BalanceSide::Credit => total_credit - total_debit,
        };
        if net < Decimal::ZERO {
            Balance::new(-net, normal_side.opposite())
        } else {
            Balance::new(net, normal_side)
        }
    }

    /// An account's balance as of a date (inclusive), opening balance
    /// folded in. `as_of = None` means all entries.
    #[must_use]
    pub fn account_balance(
        account: &LedgerAccount,
        nature: AccountNature,
        entries: &[JournalEntry],
        as_of: Option<NaiveDate>,
    ) -> Balance {
        let (mut debit, mut credit) = account.opening_totals();
        for entry in entries {
            if entry.ledger_account_id != account.id {
                continue;
            }
            if as_of.is_some_and(|limit| entry.date > limit) {
                continue;
            }
            debit += entry.debit_amount;
            credit += entry.credit_amount;
        }
        Self::resolve(nature, debit, credit)
    }

    /// The balance an account opens a view with when the view starts
    /// mid-period: opening balance plus all entries strictly before
    /// `from`.
    #[must_use]
    pub fn opening_balance_as_of(
        account: &LedgerAccount,
        nature: AccountNature,
        entries: &[JournalEntry],
        from: NaiveDate,
    ) -> Balance {
        let (mut debit, mut credit) = account.opening_totals();
        for entry in entries {
            if entry.ledger_account_id == account.id && entry.date < from {
                debit += entry.debit_amount;
                credit += entry.credit_amount;
            }
        }
        Self::resolve(nature, debit, credit)
    }

    /// Builds a trial balance as of a date.
    ///
    /// Each account's closing balance lands in its debit or credit column
    /// per the sign convention. When every account is included the grand
    /// totals always balance, because every voucher posts balanced entry
    /// pairs and opening balances are part of the row totals.
    #[must_use]
    pub fn trial_balance(
        accounts: &[ClassifiedAccount],
        entries: &[JournalEntry],
        as_of: NaiveDate,
        include_zero_balances: bool,
    ) -> TrialBalanceReport {
        let mut rows = Vec::with_capacity(accounts.len());
        for classified in accounts {
            let balance = Self::account_balance(
                &classified.account,
                classified.nature,
                entries,
                Some(as_of),
            );
            if balance.is_zero() && !include_zero_balances {
                continue;
            }
            let (debit, credit) = match balance.side {
                BalanceSide::Debit => (balance.amount, Decimal::ZERO),
                BalanceSide::Credit => (Decimal::ZERO, balance.amount),
            };
            rows.push(TrialBalanceRow {
                account_id: classified.account.id,
                code: classified.account.code.clone(),
                name: classified.account.name.clone(),
                account_group_id: classified.account.account_group_id,
                debit,
                credit,
            });
        }

        let mut group_index: HashMap<AccountGroupId, usize> = HashMap::new();
        let mut group_totals: Vec<TrialBalanceGroupTotal> = Vec::new();
        for row in &rows {
            let index = *group_index.entry(row.account_group_id).or_insert_with(|| {
                group_totals.push(TrialBalanceGroupTotal {
                    account_group_id: row.account_group_id,
                    debit: Decimal::ZERO,
                    credit: Decimal::ZERO,
                });
                group_totals.len() - 1
            });
            group_totals[index].debit += row.debit;
            group_totals[index].credit += row.credit;
        }

        let total_debit: Decimal = rows.iter().map(|row| row.debit).sum();
        let total_credit: Decimal = rows.iter().map(|row| row.credit).sum();

        TrialBalanceReport {
            as_of,
            rows,
            group_totals,
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        }
    }

    /// Aggregates debit/credit totals across all accounts of one nature,
    /// restricted to a date window.
    ///
    /// With `from = None` the window is open-ended at the start and each
    /// account's opening balance is folded in (balance-sheet style). With a
    /// `from` date the opening balances fall before the window and are
    /// excluded (profit-and-loss style).
    ///
    /// `gross_profit_only` additionally filters on the group's
    /// `affects_gross_profit` flag.
    #[must_use]
    pub fn nature_total(
        accounts: &[ClassifiedAccount],
        entries: &[JournalEntry],
        nature: AccountNature,
        from: Option<NaiveDate>,
        to: NaiveDate,
        gross_profit_only: bool,
    ) -> NatureTotals {
        let mut debit = Decimal::ZERO;
        let mut credit = Decimal::ZERO;

        for classified in accounts {
            if classified.nature != nature {
                continue;
            }
            if gross_profit_only && !classified.affects_gross_profit {
                continue;
            }
            if from.is_none() {
                let (open_debit, open_credit) = classified.account.opening_totals();
                debit += open_debit;
                credit += open_credit;
            }
            for entry in entries {
                if entry.ledger_account_id != classified.account.id {
                    continue;
                }
                if entry.date > to {
                    continue;
                }
                if from.is_some_and(|start| entry.date < start) {
                    continue;
                }
                debit += entry.debit_amount;
                credit += entry.credit_amount;
            }
        }

        NatureTotals {
            nature,
            debit,
            credit,
            net: Self::resolve(nature, debit, credit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kontu_shared::types::{
        BusinessId, FinancialYearId, JournalEntryId, LedgerAccountId, VoucherId,
    };
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn account(opening: Decimal, side: BalanceSide) -> LedgerAccount {
        LedgerAccount {
            id: LedgerAccountId::new(),
            business_id: BusinessId::new(),
            account_group_id: kontu_shared::types::AccountGroupId::new(),
            code: None,
            name: "Test".to_string(),
            opening_balance: opening,
            opening_balance_side: side,
            is_bank_account: false,
            is_cash_account: false,
            is_system: false,
            is_active: true,
        }
    }

    fn entry(
        account_id: LedgerAccountId,
        date: (i32, u32, u32),
        debit: Decimal,
        credit: Decimal,
    ) -> JournalEntry {
        JournalEntry {
            id: JournalEntryId::new(),
            business_id: BusinessId::new(),
            voucher_id: VoucherId::new(),
            ledger_account_id: account_id,
            cost_center_id: None,
            financial_year_id: FinancialYearId::new(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            debit_amount: debit,
            credit_amount: credit,
            narration: None,
        }
    }

    #[rstest]
    #[case(AccountNature::Assets, dec!(500), dec!(200), dec!(300), BalanceSide::Debit)]
    #[case(AccountNature::Assets, dec!(200), dec!(500), dec!(300), BalanceSide::Credit)]
    #[case(AccountNature::Expense, dec!(100), dec!(0), dec!(100), BalanceSide::Debit)]
    #[case(AccountNature::Income, dec!(100), dec!(600), dec!(500), BalanceSide::Credit)]
    #[case(AccountNature::Income, dec!(600), dec!(100), dec!(500), BalanceSide::Debit)]
    #[case(AccountNature::Liabilities, dec!(0), dec!(250), dec!(250), BalanceSide::Credit)]
    #[case(AccountNature::Equity, dec!(0), dec!(0), dec!(0), BalanceSide::Credit)]
    fn test_resolve_sign_convention(
        #[case] nature: AccountNature,
        #[case] debit: Decimal,
        #[case] credit: Decimal,
        #[case] amount: Decimal,
        #[case] side: BalanceSide,
    ) {
        let balance = BalanceEngine::resolve(nature, debit, credit);
        assert_eq!(balance.amount, amount);
        assert_eq!(balance.side, side);
    }

    #[test]
    fn test_account_balance_scenario() {
        // Voucher: debit 500 Cash, credit 500 Sales.
        let cash = account(dec!(0), BalanceSide::Debit);
        let sales = account(dec!(0), BalanceSide::Credit);
        let entries = vec![
            entry(cash.id, (2025, 6, 1), dec!(500), dec!(0)),
            entry(sales.id, (2025, 6, 1), dec!(0), dec!(500)),
        ];

        let cash_balance =
            BalanceEngine::account_balance(&cash, AccountNature::Assets, &entries, None);
        assert_eq!(cash_balance, Balance::new(dec!(500), BalanceSide::Debit));

        let sales_balance =
            BalanceEngine::account_balance(&sales, AccountNature::Income, &entries, None);
        assert_eq!(sales_balance, Balance::new(dec!(500), BalanceSide::Credit));
    }

    #[test]
    fn test_account_balance_respects_as_of() {
        let cash = account(dec!(0), BalanceSide::Debit);
        let entries = vec![
            entry(cash.id, (2025, 1, 10), dec!(100), dec!(0)),
            entry(cash.id, (2025, 3, 10), dec!(50), dec!(0)),
        ];
        let balance = BalanceEngine::account_balance(
            &cash,
            AccountNature::Assets,
            &entries,
            Some(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()),
        );
        assert_eq!(balance.amount, dec!(100));
    }

    #[test]
    fn test_opening_balance_folds_before_sign_resolution() {
        // Opening 200 credit on an asset account, then 150 debit activity:
        // net 50 credit, reported on the flipped side.
        let odd = account(dec!(200), BalanceSide::Credit);
        let entries = vec![entry(odd.id, (2025, 1, 5), dec!(150), dec!(0))];
        let balance = BalanceEngine::account_balance(&odd, AccountNature::Assets, &entries, None);
        assert_eq!(balance, Balance::new(dec!(50), BalanceSide::Credit));
    }

    #[test]
    fn test_opening_balance_as_of_is_strict() {
        let cash = account(dec!(100), BalanceSide::Debit);
        let cutoff = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let entries = vec![
            entry(cash.id, (2025, 1, 31), dec!(40), dec!(0)),
            entry(cash.id, (2025, 2, 1), dec!(7), dec!(0)),
        ];
        let opening =
            BalanceEngine::opening_balance_as_of(&cash, AccountNature::Assets, &entries, cutoff);
        // Entry dated exactly on the cutoff is excluded.
        assert_eq!(opening.amount, dec!(140));
    }

    fn classified(
        nature: AccountNature,
        opening: Decimal,
        affects_gross_profit: bool,
    ) -> ClassifiedAccount {
        let side = nature.normal_side();
        ClassifiedAccount {
            account: account(opening, side),
            nature,
            affects_gross_profit,
        }
    }

    #[test]
    fn test_trial_balance_balances() {
        let cash = classified(AccountNature::Assets, dec!(0), false);
        let sales = classified(AccountNature::Income, dec!(0), true);
        let expense = classified(AccountNature::Expense, dec!(0), false);
        let entries = vec![
            entry(cash.account.id, (2025, 4, 1), dec!(900), dec!(0)),
            entry(sales.account.id, (2025, 4, 1), dec!(0), dec!(900)),
            entry(expense.account.id, (2025, 5, 1), dec!(300), dec!(0)),
            entry(cash.account.id, (2025, 5, 1), dec!(0), dec!(300)),
        ];
        let accounts = vec![cash, sales, expense];
        let report = BalanceEngine::trial_balance(
            &accounts,
            &entries,
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            true,
        );

        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.total_debit, report.total_credit);
        assert!(report.is_balanced);
        assert_eq!(report.total_debit, dec!(900));
    }

    #[test]
    fn test_trial_balance_zero_filter() {
        let cash = classified(AccountNature::Assets, dec!(0), false);
        let dormant = classified(AccountNature::Assets, dec!(0), false);
        let sales = classified(AccountNature::Income, dec!(0), true);
        let entries = vec![
            entry(cash.account.id, (2025, 4, 1), dec!(100), dec!(0)),
            entry(sales.account.id, (2025, 4, 1), dec!(0), dec!(100)),
        ];
        let dormant_id = dormant.account.id;
        let accounts = vec![cash, dormant, sales];
        let as_of = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();

        let filtered = BalanceEngine::trial_balance(&accounts, &entries, as_of, false);
        assert_eq!(filtered.rows.len(), 2);
        assert!(filtered.rows.iter().all(|row| row.account_id != dormant_id));
        assert!(filtered.is_balanced);

        let full = BalanceEngine::trial_balance(&accounts, &entries, as_of, true);
        assert_eq!(full.rows.len(), 3);
    }

    #[test]
    fn test_trial_balance_group_subtotals() {
        let mut cash = classified(AccountNature::Assets, dec!(0), false);
        let mut bank = classified(AccountNature::Assets, dec!(0), false);
        let group = kontu_shared::types::AccountGroupId::new();
        cash.account.account_group_id = group;
        bank.account.account_group_id = group;
        let sales = classified(AccountNature::Income, dec!(0), true);
        let entries = vec![
            entry(cash.account.id, (2025, 4, 1), dec!(100), dec!(0)),
            entry(bank.account.id, (2025, 4, 2), dec!(150), dec!(0)),
            entry(sales.account.id, (2025, 4, 2), dec!(0), dec!(250)),
        ];
        let accounts = vec![cash, bank, sales];
        let report = BalanceEngine::trial_balance(
            &accounts,
            &entries,
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            true,
        );

        let subtotal = report
            .group_totals
            .iter()
            .find(|total| total.account_group_id == group)
            .unwrap();
        assert_eq!(subtotal.debit, dec!(250));
        assert_eq!(subtotal.credit, dec!(0));
    }

    #[test]
    fn test_nature_total_window_and_gross_profit() {
        let sales = classified(AccountNature::Income, dec!(0), true);
        let other_income = classified(AccountNature::Income, dec!(0), false);
        let entries = vec![
            entry(sales.account.id, (2025, 2, 1), dec!(0), dec!(1000)),
            entry(other_income.account.id, (2025, 2, 15), dec!(0), dec!(200)),
            // Outside the window:
            entry(sales.account.id, (2025, 8, 1), dec!(0), dec!(999)),
        ];
        let accounts = vec![sales, other_income];
        let from = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();

        let all = BalanceEngine::nature_total(
            &accounts,
            &entries,
            AccountNature::Income,
            Some(from),
            to,
            false,
        );
        assert_eq!(all.net.amount, dec!(1200));
        assert_eq!(all.net.side, BalanceSide::Credit);

        let gross = BalanceEngine::nature_total(
            &accounts,
            &entries,
            AccountNature::Income,
            Some(from),
            to,
            true,
        );
        assert_eq!(gross.net.amount, dec!(1000));
    }

    #[test]
    fn test_nature_total_includes_opening_when_unbounded() {
        let cash = classified(AccountNature::Assets, dec!(500), false);
        let accounts = vec![cash];
        let to = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();

        let with_opening =
            BalanceEngine::nature_total(&accounts, &[], AccountNature::Assets, None, to, false);
        assert_eq!(with_opening.net.amount, dec!(500));

        let windowed = BalanceEngine::nature_total(
            &accounts,
            &[],
            AccountNature::Assets,
            Some(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
            to,
            false,
        );
        assert_eq!(windowed.net.amount, dec!(0));
    }

    proptest! {
        /// The balance invariant: over any set of balanced voucher entry
        /// pairs plus mirrored opening balances, summing signed balances
        /// across all accounts nets to zero.
        #[test]
        fn prop_books_always_balance(
            amounts in prop::collection::vec(1i64..1_000_000i64, 1..20),
        ) {
            let cash = classified(AccountNature::Assets, dec!(0), false);
            let sales = classified(AccountNature::Income, dec!(0), true);
            let mut entries = Vec::new();
            for (day, cents) in amounts.iter().enumerate() {
                let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
                    + chrono::Days::new(day as u64);
                let amount = Decimal::new(*cents, 2);
                entries.push(JournalEntry {
                    date,
                    ..entry(cash.account.id, (2025, 1, 1), amount, dec!(0))
                });
                entries.push(JournalEntry {
                    date,
                    ..entry(sales.account.id, (2025, 1, 1), dec!(0), amount)
                });
            }
            let accounts = vec![cash, sales];
            let report = BalanceEngine::trial_balance(
                &accounts,
                &entries,
                NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                true,
            );
            prop_assert!(report.is_balanced);
            prop_assert_eq!(report.total_debit, report.total_credit);
        }

        /// Resolution never produces a negative amount.
        #[test]
        fn prop_resolved_amount_non_negative(
            debit in 0i64..10_000_000i64,
            credit in 0i64..10_000_000i64,
        ) {
            for nature in AccountNature::all() {
                let balance = BalanceEngine::resolve(
                    nature,
                    Decimal::new(debit, 2),
                    Decimal::new(credit, 2),
                );
                prop_assert!(balance.amount >= Decimal::ZERO);
            }
        }
    }
}
