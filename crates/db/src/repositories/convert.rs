//! Conversions between entity models and core domain types.
//!
//! Enumerated columns are stored as lowercase strings; a value that fails
//! to parse indicates schema corruption and surfaces as an internal error.

use std::str::FromStr;

use kontu_core::accounts::types::{AccountGroup, AccountNature, CostCenter, LedgerAccount};
use kontu_core::budget::types::{Budget, BudgetItem, MONTHS_PER_YEAR};
use kontu_core::fiscal::FinancialYear;
use kontu_core::journal::JournalEntry;
use kontu_core::party::{Party, PartyKind};
use kontu_core::reconcile::types::{Reconciliation, ReconciliationItem};
use kontu_core::recurring::types::{Frequency, RecurringTransaction, TemplateItem};
use kontu_core::voucher::types::{Voucher, VoucherItem, VoucherNature, VoucherType};
use kontu_shared::types::{
    AccountGroupId, BalanceSide, BudgetId, BudgetItemId, BusinessId, CostCenterId,
    FinancialYearId, JournalEntryId, LedgerAccountId, PartyId, ReconciliationId,
    ReconciliationItemId, RecurringTransactionId, UserId, VoucherId, VoucherItemId, VoucherTypeId,
};
use kontu_shared::{AppError, AppResult};

use crate::entities::{
    account_groups, budget_items, budgets, cost_centers, financial_years, journal_entries,
    ledger_accounts, parties, reconciliation_items, reconciliations, recurring_template_items,
    recurring_transactions, voucher_items, voucher_types, vouchers,
};

fn parse_enum<T: FromStr<Err = String>>(value: &str, column: &str) -> AppResult<T> {
    value
        .parse()
        .map_err(|err| AppError::Internal(format!("corrupt {column} column: {err}")))
}

pub(crate) fn account_group(model: account_groups::Model) -> AppResult<AccountGroup> {
    Ok(AccountGroup {
        id: AccountGroupId::from_uuid(model.id),
        business_id: BusinessId::from_uuid(model.business_id),
        parent_id: model.parent_id.map(AccountGroupId::from_uuid),
        name: model.name,
        nature: parse_enum::<AccountNature>(&model.nature, "nature")?,
        affects_gross_profit: model.affects_gross_profit,
        sequence: model.sequence,
        is_system: model.is_system,
    })
}

pub(crate) fn ledger_account(model: ledger_accounts::Model) -> AppResult<LedgerAccount> {
    Ok(LedgerAccount {
        id: LedgerAccountId::from_uuid(model.id),
        business_id: BusinessId::from_uuid(model.business_id),
        account_group_id: AccountGroupId::from_uuid(model.account_group_id),
        code: model.code,
        name: model.name,
        opening_balance: model.opening_balance,
        opening_balance_side: parse_enum::<BalanceSide>(
            &model.opening_balance_side,
            "opening_balance_side",
        )?,
        is_bank_account: model.is_bank_account,
        is_cash_account: model.is_cash_account,
        is_system: model.is_system,
        is_active: model.is_active,
    })
}

pub(crate) fn cost_center(model: cost_centers::Model) -> CostCenter {
    CostCenter {
        id: CostCenterId::from_uuid(model.id),
        business_id: BusinessId::from_uuid(model.business_id),
        parent_id: model.parent_id.map(CostCenterId::from_uuid),
        name: model.name,
        code: model.code,
        is_active: model.is_active,
    }
}

pub(crate) fn financial_year(model: financial_years::Model) -> FinancialYear {
    FinancialYear {
        id: FinancialYearId::from_uuid(model.id),
        business_id: BusinessId::from_uuid(model.business_id),
        name: model.name,
        start_date: model.start_date,
        end_date: model.end_date,
        is_current: model.is_current,
        is_locked: model.is_locked,
    }
}

pub(crate) fn voucher_type(model: voucher_types::Model) -> AppResult<VoucherType> {
    Ok(VoucherType {
        id: VoucherTypeId::from_uuid(model.id),
        business_id: BusinessId::from_uuid(model.business_id),
        name: model.name,
        code: model.code,
        nature: parse_enum::<VoucherNature>(&model.nature, "nature")?,
        prefix: model.prefix,
        auto_increment: model.auto_increment,
        starting_number: model.starting_number,
        is_system: model.is_system,
    })
}

pub(crate) fn voucher(model: vouchers::Model) -> Voucher {
    Voucher {
        id: VoucherId::from_uuid(model.id),
        business_id: BusinessId::from_uuid(model.business_id),
        voucher_type_id: VoucherTypeId::from_uuid(model.voucher_type_id),
        financial_year_id: FinancialYearId::from_uuid(model.financial_year_id),
        voucher_number: model.voucher_number,
        date: model.date,
        party_id: model.party_id.map(PartyId::from_uuid),
        narration: model.narration,
        reference: model.reference,
        is_posted: model.is_posted,
        total_amount: model.total_amount,
        created_by: UserId::from_uuid(model.created_by),
        updated_by: model.updated_by.map(UserId::from_uuid),
    }
}

pub(crate) fn voucher_item(model: voucher_items::Model) -> VoucherItem {
    VoucherItem {
        id: VoucherItemId::from_uuid(model.id),
        voucher_id: VoucherId::from_uuid(model.voucher_id),
        ledger_account_id: LedgerAccountId::from_uuid(model.ledger_account_id),
        cost_center_id: model.cost_center_id.map(CostCenterId::from_uuid),
        debit_amount: model.debit_amount,
        credit_amount: model.credit_amount,
        narration: model.narration,
        sequence: model.sequence,
    }
}

pub(crate) fn journal_entry(model: journal_entries::Model) -> JournalEntry {
    JournalEntry {
        id: JournalEntryId::from_uuid(model.id),
        business_id: BusinessId::from_uuid(model.business_id),
        voucher_id: VoucherId::from_uuid(model.voucher_id),
        ledger_account_id: LedgerAccountId::from_uuid(model.ledger_account_id),
        cost_center_id: model.cost_center_id.map(CostCenterId::from_uuid),
        financial_year_id: FinancialYearId::from_uuid(model.financial_year_id),
        date: model.date,
        debit_amount: model.debit_amount,
        credit_amount: model.credit_amount,
        narration: model.narration,
    }
}

pub(crate) fn party(model: parties::Model) -> AppResult<Party> {
    Ok(Party {
        id: PartyId::from_uuid(model.id),
        business_id: BusinessId::from_uuid(model.business_id),
        ledger_account_id: LedgerAccountId::from_uuid(model.ledger_account_id),
        name: model.name,
        kind: parse_enum::<PartyKind>(&model.kind, "kind")?,
        credit_limit: model.credit_limit,
        credit_period_days: model.credit_period_days,
    })
}

pub(crate) fn reconciliation(model: reconciliations::Model) -> Reconciliation {
    Reconciliation {
        id: ReconciliationId::from_uuid(model.id),
        business_id: BusinessId::from_uuid(model.business_id),
        ledger_account_id: LedgerAccountId::from_uuid(model.ledger_account_id),
        statement_date: model.statement_date,
        statement_balance: model.statement_balance,
        account_balance: model.account_balance,
        reconciled_balance: model.reconciled_balance,
        is_completed: model.is_completed,
        completed_by: model.completed_by.map(UserId::from_uuid),
        completed_at: model.completed_at.map(Into::into),
    }
}

pub(crate) fn reconciliation_item(model: reconciliation_items::Model) -> ReconciliationItem {
    ReconciliationItem {
        id: ReconciliationItemId::from_uuid(model.id),
        reconciliation_id: ReconciliationId::from_uuid(model.reconciliation_id),
        journal_entry_id: JournalEntryId::from_uuid(model.journal_entry_id),
    }
}

pub(crate) fn budget(model: budgets::Model) -> Budget {
    Budget {
        id: BudgetId::from_uuid(model.id),
        business_id: BusinessId::from_uuid(model.business_id),
        financial_year_id: FinancialYearId::from_uuid(model.financial_year_id),
        name: model.name,
        is_active: model.is_active,
    }
}

pub(crate) fn budget_item(model: budget_items::Model) -> BudgetItem {
    let monthly_amounts: [rust_decimal::Decimal; MONTHS_PER_YEAR] = [
        model.month_01,
        model.month_02,
        model.month_03,
        model.month_04,
        model.month_05,
        model.month_06,
        model.month_07,
        model.month_08,
        model.month_09,
        model.month_10,
        model.month_11,
        model.month_12,
    ];
    BudgetItem {
        id: BudgetItemId::from_uuid(model.id),
        budget_id: BudgetId::from_uuid(model.budget_id),
        ledger_account_id: LedgerAccountId::from_uuid(model.ledger_account_id),
        cost_center_id: model.cost_center_id.map(CostCenterId::from_uuid),
        monthly_amounts,
        annual_amount: model.annual_amount,
    }
}

pub(crate) fn recurring_transaction(
    model: recurring_transactions::Model,
    template_models: Vec<recurring_template_items::Model>,
) -> AppResult<RecurringTransaction> {
    let template = template_models
        .into_iter()
        .map(|item| TemplateItem {
            ledger_account_id: LedgerAccountId::from_uuid(item.ledger_account_id),
            cost_center_id: item.cost_center_id.map(CostCenterId::from_uuid),
            debit_amount: item.debit_amount,
            credit_amount: item.credit_amount,
        })
        .collect();

    Ok(RecurringTransaction {
        id: RecurringTransactionId::from_uuid(model.id),
        business_id: BusinessId::from_uuid(model.business_id),
        voucher_type_id: VoucherTypeId::from_uuid(model.voucher_type_id),
        name: model.name,
        frequency: parse_enum::<Frequency>(&model.frequency, "frequency")?,
        day_of_month: model.day_of_month.and_then(|day| u32::try_from(day).ok()),
        day_of_week: model.day_of_week.and_then(|day| u32::try_from(day).ok()),
        month: model.month.and_then(|month| u32::try_from(month).ok()),
        start_date: model.start_date,
        end_date: model.end_date,
        occurrences: model.occurrences,
        occurrences_generated: model.occurrences_generated,
        narration: model.narration,
        template,
        is_active: model.is_active,
    })
}
