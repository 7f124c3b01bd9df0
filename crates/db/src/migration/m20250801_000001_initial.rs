//! Initial database migration.
//!
//! Creates the full bookkeeping schema. Monetary columns are
//! `DECIMAL(18,2)`; enumerated columns are lowercase strings guarded by
//! CHECK constraints. Foreign keys into tenant-scoped tables are composite
//! on `(business_id, id)` wherever a referencing row carries its own
//! `business_id`, so a guessed id can never cross a tenant boundary.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(BUSINESSES_SQL).await?;
        db.execute_unprepared(ACCOUNT_GROUPS_SQL).await?;
        db.execute_unprepared(LEDGER_ACCOUNTS_SQL).await?;
        db.execute_unprepared(COST_CENTERS_SQL).await?;
        db.execute_unprepared(FINANCIAL_YEARS_SQL).await?;
        db.execute_unprepared(VOUCHER_TYPES_SQL).await?;
        db.execute_unprepared(PARTIES_SQL).await?;
        db.execute_unprepared(VOUCHERS_SQL).await?;
        db.execute_unprepared(VOUCHER_ITEMS_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(RECONCILIATIONS_SQL).await?;
        db.execute_unprepared(RECONCILIATION_ITEMS_SQL).await?;
        db.execute_unprepared(BUDGETS_SQL).await?;
        db.execute_unprepared(BUDGET_ITEMS_SQL).await?;
        db.execute_unprepared(RECURRING_TRANSACTIONS_SQL).await?;
        db.execute_unprepared(RECURRING_TEMPLATE_ITEMS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const BUSINESSES_SQL: &str = r"
CREATE TABLE businesses (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ACCOUNT_GROUPS_SQL: &str = r"
CREATE TABLE account_groups (
    id UUID PRIMARY KEY,
    business_id UUID NOT NULL REFERENCES businesses (id),
    parent_id UUID REFERENCES account_groups (id),
    name TEXT NOT NULL,
    nature TEXT NOT NULL CHECK (nature IN ('assets', 'liabilities', 'income', 'expense', 'equity')),
    affects_gross_profit BOOLEAN NOT NULL DEFAULT FALSE,
    sequence INTEGER NOT NULL DEFAULT 0,
    is_system BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (business_id, id)
);

CREATE INDEX idx_account_groups_business ON account_groups (business_id);
CREATE INDEX idx_account_groups_parent ON account_groups (parent_id);
";

const LEDGER_ACCOUNTS_SQL: &str = r"
CREATE TABLE ledger_accounts (
    id UUID PRIMARY KEY,
    business_id UUID NOT NULL REFERENCES businesses (id),
    account_group_id UUID NOT NULL,
    code TEXT,
    name TEXT NOT NULL,
    opening_balance DECIMAL(18,2) NOT NULL DEFAULT 0,
    opening_balance_side TEXT NOT NULL DEFAULT 'debit' CHECK (opening_balance_side IN ('debit', 'credit')),
    is_bank_account BOOLEAN NOT NULL DEFAULT FALSE,
    is_cash_account BOOLEAN NOT NULL DEFAULT FALSE,
    is_system BOOLEAN NOT NULL DEFAULT FALSE,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (business_id, id),
    FOREIGN KEY (business_id, account_group_id) REFERENCES account_groups (business_id, id)
);

CREATE UNIQUE INDEX idx_ledger_accounts_code
    ON ledger_accounts (business_id, code) WHERE code IS NOT NULL;
CREATE INDEX idx_ledger_accounts_group ON ledger_accounts (account_group_id);
";

const COST_CENTERS_SQL: &str = r"
CREATE TABLE cost_centers (
    id UUID PRIMARY KEY,
    business_id UUID NOT NULL REFERENCES businesses (id),
    parent_id UUID REFERENCES cost_centers (id),
    name TEXT NOT NULL,
    code TEXT NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (business_id, id),
    UNIQUE (business_id, code)
);
";

const FINANCIAL_YEARS_SQL: &str = r"
CREATE TABLE financial_years (
    id UUID PRIMARY KEY,
    business_id UUID NOT NULL REFERENCES businesses (id),
    name TEXT NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    is_current BOOLEAN NOT NULL DEFAULT FALSE,
    is_locked BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (business_id, id),
    CHECK (start_date <= end_date)
);

CREATE UNIQUE INDEX idx_financial_years_current
    ON financial_years (business_id) WHERE is_current;
";

const VOUCHER_TYPES_SQL: &str = r"
CREATE TABLE voucher_types (
    id UUID PRIMARY KEY,
    business_id UUID NOT NULL REFERENCES businesses (id),
    name TEXT NOT NULL,
    code TEXT NOT NULL,
    nature TEXT NOT NULL CHECK (nature IN (
        'receipt', 'payment', 'contra', 'journal',
        'sales', 'purchase', 'debit_note', 'credit_note')),
    prefix TEXT,
    auto_increment BOOLEAN NOT NULL DEFAULT TRUE,
    starting_number BIGINT NOT NULL DEFAULT 1,
    is_system BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (business_id, id),
    UNIQUE (business_id, code)
);
";

const PARTIES_SQL: &str = r"
CREATE TABLE parties (
    id UUID PRIMARY KEY,
    business_id UUID NOT NULL REFERENCES businesses (id),
    ledger_account_id UUID NOT NULL UNIQUE,
    name TEXT NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('customer', 'supplier', 'both')),
    credit_limit DECIMAL(18,2),
    credit_period_days INTEGER,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (business_id, id),
    FOREIGN KEY (business_id, ledger_account_id) REFERENCES ledger_accounts (business_id, id)
);
";

const VOUCHERS_SQL: &str = r"
CREATE TABLE vouchers (
    id UUID PRIMARY KEY,
    business_id UUID NOT NULL REFERENCES businesses (id),
    voucher_type_id UUID NOT NULL,
    financial_year_id UUID NOT NULL,
    voucher_number TEXT NOT NULL,
    date DATE NOT NULL,
    party_id UUID,
    narration TEXT,
    reference TEXT,
    is_posted BOOLEAN NOT NULL DEFAULT FALSE,
    total_amount DECIMAL(18,2) NOT NULL DEFAULT 0,
    created_by UUID NOT NULL,
    updated_by UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (business_id, id),
    UNIQUE (business_id, voucher_type_id, financial_year_id, voucher_number),
    FOREIGN KEY (business_id, voucher_type_id) REFERENCES voucher_types (business_id, id),
    FOREIGN KEY (business_id, financial_year_id) REFERENCES financial_years (business_id, id),
    FOREIGN KEY (business_id, party_id) REFERENCES parties (business_id, id)
);

CREATE INDEX idx_vouchers_business_date ON vouchers (business_id, date);
CREATE INDEX idx_vouchers_party ON vouchers (party_id);
";

const VOUCHER_ITEMS_SQL: &str = r"
CREATE TABLE voucher_items (
    id UUID PRIMARY KEY,
    voucher_id UUID NOT NULL REFERENCES vouchers (id) ON DELETE CASCADE,
    ledger_account_id UUID NOT NULL REFERENCES ledger_accounts (id),
    cost_center_id UUID REFERENCES cost_centers (id),
    debit_amount DECIMAL(18,2) NOT NULL DEFAULT 0,
    credit_amount DECIMAL(18,2) NOT NULL DEFAULT 0,
    narration TEXT,
    sequence INTEGER NOT NULL DEFAULT 0,
    CHECK (debit_amount >= 0 AND credit_amount >= 0)
);

CREATE INDEX idx_voucher_items_voucher ON voucher_items (voucher_id);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY,
    business_id UUID NOT NULL REFERENCES businesses (id),
    voucher_id UUID NOT NULL,
    ledger_account_id UUID NOT NULL,
    cost_center_id UUID REFERENCES cost_centers (id),
    financial_year_id UUID NOT NULL,
    date DATE NOT NULL,
    debit_amount DECIMAL(18,2) NOT NULL DEFAULT 0,
    credit_amount DECIMAL(18,2) NOT NULL DEFAULT 0,
    narration TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    FOREIGN KEY (business_id, voucher_id) REFERENCES vouchers (business_id, id) ON DELETE CASCADE,
    FOREIGN KEY (business_id, ledger_account_id) REFERENCES ledger_accounts (business_id, id),
    FOREIGN KEY (business_id, financial_year_id) REFERENCES financial_years (business_id, id)
);

CREATE INDEX idx_journal_entries_account_date
    ON journal_entries (business_id, ledger_account_id, date);
CREATE INDEX idx_journal_entries_voucher ON journal_entries (voucher_id);
";

const RECONCILIATIONS_SQL: &str = r"
CREATE TABLE account_reconciliations (
    id UUID PRIMARY KEY,
    business_id UUID NOT NULL REFERENCES businesses (id),
    ledger_account_id UUID NOT NULL,
    statement_date DATE NOT NULL,
    statement_balance DECIMAL(18,2) NOT NULL,
    account_balance DECIMAL(18,2) NOT NULL DEFAULT 0,
    reconciled_balance DECIMAL(18,2) NOT NULL DEFAULT 0,
    is_completed BOOLEAN NOT NULL DEFAULT FALSE,
    completed_by UUID,
    completed_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    FOREIGN KEY (business_id, ledger_account_id) REFERENCES ledger_accounts (business_id, id)
);
";

const RECONCILIATION_ITEMS_SQL: &str = r"
CREATE TABLE reconciliation_items (
    id UUID PRIMARY KEY,
    reconciliation_id UUID NOT NULL REFERENCES account_reconciliations (id) ON DELETE CASCADE,
    journal_entry_id UUID NOT NULL UNIQUE REFERENCES journal_entries (id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const BUDGETS_SQL: &str = r"
CREATE TABLE budgets (
    id UUID PRIMARY KEY,
    business_id UUID NOT NULL REFERENCES businesses (id),
    financial_year_id UUID NOT NULL,
    name TEXT NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    FOREIGN KEY (business_id, financial_year_id) REFERENCES financial_years (business_id, id)
);
";

const BUDGET_ITEMS_SQL: &str = r"
CREATE TABLE budget_items (
    id UUID PRIMARY KEY,
    budget_id UUID NOT NULL REFERENCES budgets (id) ON DELETE CASCADE,
    ledger_account_id UUID NOT NULL REFERENCES ledger_accounts (id),
    cost_center_id UUID REFERENCES cost_centers (id),
    month_01 DECIMAL(18,2) NOT NULL DEFAULT 0,
    month_02 DECIMAL(18,2) NOT NULL DEFAULT 0,
    month_03 DECIMAL(18,2) NOT NULL DEFAULT 0,
    month_04 DECIMAL(18,2) NOT NULL DEFAULT 0,
    month_05 DECIMAL(18,2) NOT NULL DEFAULT 0,
    month_06 DECIMAL(18,2) NOT NULL DEFAULT 0,
    month_07 DECIMAL(18,2) NOT NULL DEFAULT 0,
    month_08 DECIMAL(18,2) NOT NULL DEFAULT 0,
    month_09 DECIMAL(18,2) NOT NULL DEFAULT 0,
    month_10 DECIMAL(18,2) NOT NULL DEFAULT 0,
    month_11 DECIMAL(18,2) NOT NULL DEFAULT 0,
    month_12 DECIMAL(18,2) NOT NULL DEFAULT 0,
    annual_amount DECIMAL(18,2) NOT NULL DEFAULT 0,
    UNIQUE NULLS NOT DISTINCT (budget_id, ledger_account_id, cost_center_id)
);
";

const RECURRING_TRANSACTIONS_SQL: &str = r"
CREATE TABLE recurring_transactions (
    id UUID PRIMARY KEY,
    business_id UUID NOT NULL REFERENCES businesses (id),
    voucher_type_id UUID NOT NULL,
    name TEXT NOT NULL,
    frequency TEXT NOT NULL CHECK (frequency IN (
        'daily', 'weekly', 'monthly', 'quarterly', 'yearly')),
    day_of_month INTEGER CHECK (day_of_month BETWEEN 1 AND 31),
    day_of_week INTEGER CHECK (day_of_week BETWEEN 1 AND 7),
    month INTEGER CHECK (month BETWEEN 1 AND 12),
    start_date DATE NOT NULL,
    end_date DATE,
    occurrences INTEGER,
    occurrences_generated INTEGER NOT NULL DEFAULT 0,
    narration TEXT,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    FOREIGN KEY (business_id, voucher_type_id) REFERENCES voucher_types (business_id, id)
);
";

const RECURRING_TEMPLATE_ITEMS_SQL: &str = r"
CREATE TABLE recurring_template_items (
    id UUID PRIMARY KEY,
    recurring_transaction_id UUID NOT NULL
        REFERENCES recurring_transactions (id) ON DELETE CASCADE,
    ledger_account_id UUID NOT NULL REFERENCES ledger_accounts (id),
    cost_center_id UUID REFERENCES cost_centers (id),
    debit_amount DECIMAL(18,2) NOT NULL DEFAULT 0,
    credit_amount DECIMAL(18,2) NOT NULL DEFAULT 0,
    sequence INTEGER NOT NULL DEFAULT 0,
    CHECK (debit_amount >= 0 AND credit_amount >= 0)
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS recurring_template_items CASCADE;
DROP TABLE IF EXISTS recurring_transactions CASCADE;
DROP TABLE IF EXISTS budget_items CASCADE;
DROP TABLE IF EXISTS budgets CASCADE;
DROP TABLE IF EXISTS reconciliation_items CASCADE;
DROP TABLE IF EXISTS account_reconciliations CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS voucher_items CASCADE;
DROP TABLE IF EXISTS vouchers CASCADE;
DROP TABLE IF EXISTS parties CASCADE;
DROP TABLE IF EXISTS voucher_types CASCADE;
DROP TABLE IF EXISTS financial_years CASCADE;
DROP TABLE IF EXISTS cost_centers CASCADE;
DROP TABLE IF EXISTS ledger_accounts CASCADE;
DROP TABLE IF EXISTS account_groups CASCADE;
DROP TABLE IF EXISTS businesses CASCADE;
";
