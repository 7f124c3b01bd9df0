//! Financial report assembly.
//!
//! Read-only: queries the journal ledger and account tree, then hands the
//! aggregation to the core balance engine. Safe to run concurrently with
//! anything; never writes.

use chrono::NaiveDate;
use kontu_core::accounts::types::AccountNature;
use kontu_core::balance::engine::BalanceEngine;
use kontu_core::balance::series::monthly_series;
use kontu_core::balance::types::{ClassifiedAccount, MonthTotal, TrialBalanceReport};
use kontu_core::journal::JournalEntry;
use kontu_core::tenant::TenantContext;
use kontu_shared::types::{Balance, BusinessId, FinancialYearId, LedgerAccountId};
use kontu_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use super::{convert, map_db_err};
use crate::entities::{account_groups, financial_years, journal_entries, ledger_accounts};

/// Balance sheet report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// As-of date.
    pub as_of: NaiveDate,
    /// Total assets (debit-positive).
    pub total_assets: Decimal,
    /// Total liabilities (credit-positive).
    pub total_liabilities: Decimal,
    /// Total equity (credit-positive).
    pub total_equity: Decimal,
    /// Retained profit to date: income minus expense.
    pub retained_earnings: Decimal,
    /// Assets equal liabilities plus equity plus retained earnings.
    pub is_balanced: bool,
}

/// Profit-and-loss totals for one window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitAndLossTotals {
    /// Window start.
    pub from: NaiveDate,
    /// Window end.
    pub to: NaiveDate,
    /// Income total.
    pub income: Decimal,
    /// Expense total.
    pub expense: Decimal,
    /// Gross income (groups feeding gross profit).
    pub gross_income: Decimal,
    /// Gross expense (groups feeding gross profit).
    pub gross_expense: Decimal,
    /// Gross profit.
    pub gross_profit: Decimal,
    /// Net profit.
    pub net_profit: Decimal,
}

/// Profit-and-loss statement, optionally with a comparative window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitAndLossReport {
    /// Current window.
    pub current: ProfitAndLossTotals,
    /// Comparative window (e.g. the same span of the prior year).
    pub previous: Option<ProfitAndLossTotals>,
}

/// One statement row with its running balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementLine {
    /// The journal entry.
    pub entry: JournalEntry,
    /// Balance after this entry, signed toward the account's normal side.
    pub running_balance: Decimal,
}

/// A ledger account statement over a window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountStatement {
    /// The account reported on.
    pub ledger_account_id: LedgerAccountId,
    /// Window start.
    pub from: NaiveDate,
    /// Window end.
    pub to: NaiveDate,
    /// Balance brought forward (entries before `from` plus opening).
    pub opening: Balance,
    /// Entries in the window, oldest first.
    pub lines: Vec<StatementLine>,
    /// Balance carried forward.
    pub closing: Balance,
}

/// Repository for financial reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Trial balance as of a date. With every account included the grand
    /// totals always balance.
    pub async fn trial_balance(
        &self,
        ctx: &TenantContext,
        as_of: NaiveDate,
        include_zero_balances: bool,
    ) -> AppResult<TrialBalanceReport> {
        let accounts = self.classified_accounts(ctx).await?;
        let entries = self.entries(ctx).await?;
        Ok(BalanceEngine::trial_balance(
            &accounts,
            &entries,
            as_of,
            include_zero_balances,
        ))
    }

    /// Balance sheet as of a date. Retained earnings (income minus
    /// expense to date) closes the books: assets = liabilities + equity +
    /// retained earnings.
    pub async fn balance_sheet(
        &self,
        ctx: &TenantContext,
        as_of: NaiveDate,
    ) -> AppResult<BalanceSheetReport> {
        let accounts = self.classified_accounts(ctx).await?;
        let entries = self.entries(ctx).await?;

        let signed = |nature: AccountNature| {
            BalanceEngine::nature_total(&accounts, &entries, nature, None, as_of, false)
                .net
                .signed_toward(nature.normal_side())
        };
        let total_assets = signed(AccountNature::Assets);
        let total_liabilities = signed(AccountNature::Liabilities);
        let total_equity = signed(AccountNature::Equity);
        let retained_earnings = signed(AccountNature::Income) - signed(AccountNature::Expense);

        Ok(BalanceSheetReport {
            as_of,
            total_assets,
            total_liabilities,
            total_equity,
            retained_earnings,
            is_balanced: total_assets == total_liabilities + total_equity + retained_earnings,
        })
    }

    /// Profit and loss over a window, optionally alongside a comparative
    /// window.
    pub async fn profit_and_loss(
        &self,
        ctx: &TenantContext,
        from: NaiveDate,
        to: NaiveDate,
        compare_with: Option<(NaiveDate, NaiveDate)>,
    ) -> AppResult<ProfitAndLossReport> {
        let accounts = self.classified_accounts(ctx).await?;
        let entries = self.entries(ctx).await?;

        let current = Self::pnl_totals(&accounts, &entries, from, to);
        let previous = compare_with
            .map(|(prev_from, prev_to)| Self::pnl_totals(&accounts, &entries, prev_from, prev_to));

        Ok(ProfitAndLossReport { current, previous })
    }

    /// Per-calendar-month income/expense series for a financial year.
    pub async fn monthly_series(
        &self,
        ctx: &TenantContext,
        year_id: FinancialYearId,
    ) -> AppResult<Vec<MonthTotal>> {
        let year = financial_years::Entity::find_by_id(year_id.into_inner())
            .filter(financial_years::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("financial year {year_id}")))?;
        let year = convert::financial_year(year);

        let accounts = self.classified_accounts(ctx).await?;
        let entries = self.entries(ctx).await?;
        Ok(monthly_series(&year, &accounts, &entries))
    }

    /// An account statement over a window: balance brought forward,
    /// entries with running balances, balance carried forward.
    pub async fn account_statement(
        &self,
        ctx: &TenantContext,
        account_id: LedgerAccountId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<AccountStatement> {
        let accounts = self.classified_accounts(ctx).await?;
        let classified = accounts
            .iter()
            .find(|classified| classified.account.id == account_id)
            .ok_or_else(|| AppError::NotFound(format!("ledger account {account_id}")))?;

        let all_entries = self.entries(ctx).await?;
        let opening = BalanceEngine::opening_balance_as_of(
            &classified.account,
            classified.nature,
            &all_entries,
            from,
        );
        let closing = BalanceEngine::account_balance(
            &classified.account,
            classified.nature,
            &all_entries,
            Some(to),
        );

        let normal_side = classified.nature.normal_side();
        let mut running = opening.signed_toward(normal_side);
        let mut window: Vec<JournalEntry> = all_entries
            .into_iter()
            .filter(|entry| {
                entry.ledger_account_id == account_id && entry.date >= from && entry.date <= to
            })
            .collect();
        window.sort_by_key(|entry| entry.date);

        let lines = window
            .into_iter()
            .map(|entry| {
                let change = match normal_side {
                    kontu_shared::types::BalanceSide::Debit => entry.signed_amount(),
                    kontu_shared::types::BalanceSide::Credit => -entry.signed_amount(),
                };
                running += change;
                StatementLine {
                    entry,
                    running_balance: running,
                }
            })
            .collect();

        Ok(AccountStatement {
            ledger_account_id: account_id,
            from,
            to,
            opening,
            lines,
            closing,
        })
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn pnl_totals(
        accounts: &[ClassifiedAccount],
        entries: &[JournalEntry],
        from: NaiveDate,
        to: NaiveDate,
    ) -> ProfitAndLossTotals {
        let income = BalanceEngine::nature_total(
            accounts,
            entries,
            AccountNature::Income,
            Some(from),
            to,
            false,
        );
        let expense = BalanceEngine::nature_total(
            accounts,
            entries,
            AccountNature::Expense,
            Some(from),
            to,
            false,
        );
        let gross_income = BalanceEngine::nature_total(
            accounts,
            entries,
            AccountNature::Income,
            Some(from),
            to,
            true,
        );
        let gross_expense = BalanceEngine::nature_total(
            accounts,
            entries,
            AccountNature::Expense,
            Some(from),
            to,
            true,
        );

        let income_total = income.credit - income.debit;
        let expense_total = expense.debit - expense.credit;
        let gross_income_total = gross_income.credit - gross_income.debit;
        let gross_expense_total = gross_expense.debit - gross_expense.credit;

        ProfitAndLossTotals {
            from,
            to,
            income: income_total,
            expense: expense_total,
            gross_income: gross_income_total,
            gross_expense: gross_expense_total,
            gross_profit: gross_income_total - gross_expense_total,
            net_profit: income_total - expense_total,
        }
    }

    /// Every ledger account joined with its group's nature and
    /// gross-profit flag.
    async fn classified_accounts(
        &self,
        ctx: &TenantContext,
    ) -> AppResult<Vec<ClassifiedAccount>> {
        let groups: HashMap<uuid::Uuid, (AccountNature, bool)> = account_groups::Entity::find()
            .filter(account_groups::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|model| {
                let nature = AccountNature::from_str(&model.nature)
                    .map_err(|err| AppError::Internal(format!("corrupt nature column: {err}")))?;
                Ok((model.id, (nature, model.affects_gross_profit)))
            })
            .collect::<AppResult<_>>()?;

        ledger_accounts::Entity::find()
            .filter(ledger_accounts::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .order_by_asc(ledger_accounts::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|model| {
                let (nature, affects_gross_profit) =
                    *groups.get(&model.account_group_id).ok_or_else(|| {
                        AppError::Internal("account group missing".to_string())
                    })?;
                Ok(ClassifiedAccount {
                    account: convert::ledger_account(model)?,
                    nature,
                    affects_gross_profit,
                })
            })
            .collect()
    }

    /// The full journal ledger of a business, oldest first.
    async fn entries(&self, ctx: &TenantContext) -> AppResult<Vec<JournalEntry>> {
        let rows = journal_entries::Entity::find()
            .filter(journal_entries::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .order_by_asc(journal_entries::Column::Date)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(convert::journal_entry).collect())
    }
}
