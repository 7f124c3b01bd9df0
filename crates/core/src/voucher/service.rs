//! Voucher service: the posting state machine expressed as write plans.
//!
//! Pure business logic with no database dependencies. Lookups (accounts,
//! cost centers) come in as closures; the result of each operation is a
//! plan of rows to write, which the persistence layer applies inside a
//! single transaction so a failure never leaves partial state behind.

use kontu_shared::types::{BusinessId, CostCenterId, LedgerAccountId, VoucherId, VoucherItemId};
use kontu_shared::{AppError, AppResult};

use super::types::{
    CreateVoucherInput, UpdateVoucherInput, Voucher, VoucherItem, VoucherItemInput, VoucherType,
};
use super::validation::validate_items;
use crate::fiscal::FinancialYear;
use crate::journal::{self, JournalEntry};

/// Account facts the voucher engine needs for validation.
#[derive(Debug, Clone)]
pub struct AccountRef {
    /// Account id.
    pub id: LedgerAccountId,
    /// Owning business.
    pub business_id: BusinessId,
    /// Inactive accounts reject new postings.
    pub is_active: bool,
}

/// Cost-center facts the voucher engine needs for validation.
#[derive(Debug, Clone)]
pub struct CostCenterRef {
    /// Cost center id.
    pub id: CostCenterId,
    /// Owning business.
    pub business_id: BusinessId,
    /// Inactive cost centers reject new postings.
    pub is_active: bool,
}

/// Rows to write for a voucher creation.
#[derive(Debug, Clone)]
pub struct VoucherWritePlan {
    /// The voucher header.
    pub voucher: Voucher,
    /// The line items, sequenced.
    pub items: Vec<VoucherItem>,
    /// Journal entries; empty unless the voucher posts immediately.
    pub journal: Vec<JournalEntry>,
}

/// Rows to write for a voucher update.
///
/// The item diff is keyed by id: matched rows update, unmatched existing
/// rows delete, id-less input rows insert. For a posted voucher the journal
/// is regenerated wholesale (the previous entries are deleted first); for a
/// draft it is left empty so no stale entries survive.
#[derive(Debug, Clone)]
pub struct VoucherUpdatePlan {
    /// The updated voucher header.
    pub voucher: Voucher,
    /// Existing items with new field values.
    pub updated_items: Vec<VoucherItem>,
    /// Newly added items.
    pub inserted_items: Vec<VoucherItem>,
    /// Existing items absent from the input.
    pub deleted_item_ids: Vec<VoucherItemId>,
    /// The full replacement journal entry set (posted vouchers only).
    pub journal: Vec<JournalEntry>,
}

/// Voucher service for validation and plan construction.
pub struct VoucherService;

impl VoucherService {
    /// Validates a voucher creation and builds its write plan.
    ///
    /// The caller resolves the financial year from the voucher date,
    /// renders the voucher number, and reports whether that number already
    /// exists in the (business, type, year) scope.
    ///
    /// # Errors
    ///
    /// `CrossTenant` when type/year/account/cost-center belong to another
    /// business, `LockedPeriod` for a locked year, `Validation` for dates
    /// outside the year or inactive references, `DuplicateVoucherNumber`
    /// on a number collision, `ImbalancedVoucher` when the lines do not
    /// balance.
    pub fn plan_create<A, C>(
        input: &CreateVoucherInput,
        voucher_type: &VoucherType,
        year: &FinancialYear,
        voucher_number: String,
        number_exists: bool,
        account_lookup: A,
        cost_center_lookup: C,
    ) -> AppResult<VoucherWritePlan>
    where
        A: Fn(LedgerAccountId) -> AppResult<AccountRef>,
        C: Fn(CostCenterId) -> AppResult<CostCenterRef>,
    {
        if voucher_type.business_id != input.business_id || year.business_id != input.business_id {
            return Err(AppError::CrossTenant);
        }
        year.ensure_unlocked()?;
        year.ensure_contains(input.date)?;

        if number_exists {
            return Err(AppError::DuplicateVoucherNumber(voucher_number));
        }

        let totals = validate_items(&input.items)?;
        Self::validate_line_refs(
            input.business_id,
            &input.items,
            &account_lookup,
            &cost_center_lookup,
        )?;

        let voucher = Voucher {
            id: VoucherId::new(),
            business_id: input.business_id,
            voucher_type_id: voucher_type.id,
            financial_year_id: year.id,
            voucher_number,
            date: input.date,
            party_id: input.party_id,
            narration: input.narration.clone(),
            reference: input.reference.clone(),
            is_posted: input.is_posted,
            total_amount: totals.debit,
            created_by: input.created_by,
            updated_by: None,
        };

        let items = Self::build_items(voucher.id, &input.items, |_| None);

        let journal = if voucher.is_posted {
            journal::generate_entries(&voucher, &items)
        } else {
            Vec::new()
        };

        Ok(VoucherWritePlan {
            voucher,
            items,
            journal,
        })
    }

    /// Validates a voucher update and builds its diff plan.
    ///
    /// `current_year` is the year the voucher sits in today; `target_year`
    /// the year containing the new date (often the same). Both must be
    /// unlocked: a voucher can neither leave nor enter a locked year.
    ///
    /// # Errors
    ///
    /// Same families as [`Self::plan_create`], plus `NotFound` for an input
    /// line whose id matches no existing item.
    pub fn plan_update<A, C>(
        voucher: &Voucher,
        existing_items: &[VoucherItem],
        input: &UpdateVoucherInput,
        current_year: &FinancialYear,
        target_year: &FinancialYear,
        account_lookup: A,
        cost_center_lookup: C,
    ) -> AppResult<VoucherUpdatePlan>
    where
        A: Fn(LedgerAccountId) -> AppResult<AccountRef>,
        C: Fn(CostCenterId) -> AppResult<CostCenterRef>,
    {
        if target_year.business_id != voucher.business_id {
            return Err(AppError::CrossTenant);
        }
        current_year.ensure_unlocked()?;
        target_year.ensure_unlocked()?;
        target_year.ensure_contains(input.date)?;

        let totals = validate_items(&input.items)?;
        Self::validate_line_refs(
            voucher.business_id,
            &input.items,
            &account_lookup,
            &cost_center_lookup,
        )?;

        for item in &input.items {
            if let Some(id) = item.id {
                if !existing_items.iter().any(|existing| existing.id == id) {
                    return Err(AppError::NotFound(format!("voucher item {id}")));
                }
            }
        }

        let updated = Voucher {
            financial_year_id: target_year.id,
            date: input.date,
            party_id: input.party_id,
            narration: input.narration.clone(),
            reference: input.reference.clone(),
            total_amount: totals.debit,
            updated_by: Some(input.updated_by),
            ..voucher.clone()
        };

        let all_items = Self::build_items(voucher.id, &input.items, |input_item| input_item.id);
        let mut updated_items = Vec::new();
        let mut inserted_items = Vec::new();
        for (item, input_item) in all_items.iter().zip(&input.items) {
            if input_item.id.is_some() {
                updated_items.push(item.clone());
            } else {
                inserted_items.push(item.clone());
            }
        }

        let supplied_ids: Vec<VoucherItemId> =
            input.items.iter().filter_map(|item| item.id).collect();
        let deleted_item_ids: Vec<VoucherItemId> = existing_items
            .iter()
            .filter(|existing| !supplied_ids.contains(&existing.id))
            .map(|existing| existing.id)
            .collect();

        let journal = if updated.is_posted {
            journal::generate_entries(&updated, &all_items)
        } else {
            Vec::new()
        };

        Ok(VoucherUpdatePlan {
            voucher: updated,
            updated_items,
            inserted_items,
            deleted_item_ids,
            journal,
        })
    }

    /// Validates posting a draft voucher and generates its journal entries.
    ///
    /// # Errors
    ///
    /// `Validation` when already posted, `LockedPeriod` for a locked year.
    pub fn plan_post(
        voucher: &Voucher,
        items: &[VoucherItem],
        year: &FinancialYear,
    ) -> AppResult<Vec<JournalEntry>> {
        if voucher.is_posted {
            return Err(AppError::Validation(
                "voucher is already posted".to_string(),
            ));
        }
        year.ensure_unlocked()?;
        Ok(journal::generate_entries(voucher, items))
    }

    /// Validates unposting. The caller deletes the voucher's journal
    /// entries in the same transaction that clears `is_posted`.
    ///
    /// # Errors
    ///
    /// `Validation` when not posted, `LockedPeriod` for a locked year.
    pub fn plan_unpost(voucher: &Voucher, year: &FinancialYear) -> AppResult<()> {
        if !voucher.is_posted {
            return Err(AppError::Validation("voucher is not posted".to_string()));
        }
        year.ensure_unlocked()
    }

    /// Validates deleting a voucher. Journal entries, items and the header
    /// go in one transaction.
    ///
    /// # Errors
    ///
    /// `LockedPeriod` for a locked year.
    pub fn plan_delete(_voucher: &Voucher, year: &FinancialYear) -> AppResult<()> {
        year.ensure_unlocked()
    }

    fn validate_line_refs<A, C>(
        business_id: BusinessId,
        items: &[VoucherItemInput],
        account_lookup: &A,
        cost_center_lookup: &C,
    ) -> AppResult<()>
    where
        A: Fn(LedgerAccountId) -> AppResult<AccountRef>,
        C: Fn(CostCenterId) -> AppResult<CostCenterRef>,
    {
        for item in items {
            let account = account_lookup(item.ledger_account_id)?;
            if account.business_id != business_id {
                return Err(AppError::CrossTenant);
            }
            if !account.is_active {
                return Err(AppError::Validation(format!(
                    "ledger account {} is inactive",
                    account.id
                )));
            }
            if let Some(cost_center_id) = item.cost_center_id {
                let cost_center = cost_center_lookup(cost_center_id)?;
                if cost_center.business_id != business_id {
                    return Err(AppError::CrossTenant);
                }
                if !cost_center.is_active {
                    return Err(AppError::Validation(format!(
                        "cost center {} is inactive",
                        cost_center.id
                    )));
                }
            }
        }
        Ok(())
    }

    fn build_items(
        voucher_id: VoucherId,
        inputs: &[VoucherItemInput],
        existing_id: impl Fn(&VoucherItemInput) -> Option<VoucherItemId>,
    ) -> Vec<VoucherItem> {
        inputs
            .iter()
            .enumerate()
            .map(|(index, input)| VoucherItem {
                id: existing_id(input).unwrap_or_default(),
                voucher_id,
                ledger_account_id: input.ledger_account_id,
                cost_center_id: input.cost_center_id,
                debit_amount: input.debit_amount,
                credit_amount: input.credit_amount,
                narration: input.narration.clone(),
                sequence: i32::try_from(index).unwrap_or(i32::MAX).saturating_add(1),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voucher::types::VoucherNature;
    use chrono::NaiveDate;
    use kontu_shared::types::{FinancialYearId, UserId, VoucherTypeId};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct Fixture {
        business_id: BusinessId,
        voucher_type: VoucherType,
        year: FinancialYear,
        cash: LedgerAccountId,
        sales: LedgerAccountId,
    }

    fn fixture() -> Fixture {
        let business_id = BusinessId::new();
        Fixture {
            business_id,
            voucher_type: VoucherType {
                id: VoucherTypeId::new(),
                business_id,
                name: "Receipt Voucher".to_string(),
                code: "RV".to_string(),
                nature: VoucherNature::Receipt,
                prefix: Some("RV-".to_string()),
                auto_increment: true,
                starting_number: 1,
                is_system: true,
            },
            year: FinancialYear {
                id: FinancialYearId::new(),
                business_id,
                name: "FY 2025".to_string(),
                start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
                is_current: true,
                is_locked: false,
            },
            cash: LedgerAccountId::new(),
            sales: LedgerAccountId::new(),
        }
    }

    fn lookups(
        fixture: &Fixture,
    ) -> (
        impl Fn(LedgerAccountId) -> AppResult<AccountRef> + use<>,
        impl Fn(CostCenterId) -> AppResult<CostCenterRef> + use<>,
    ) {
        let business_id = fixture.business_id;
        let known = vec![fixture.cash, fixture.sales];
        let accounts = move |id: LedgerAccountId| -> AppResult<AccountRef> {
            if known.contains(&id) {
                Ok(AccountRef {
                    id,
                    business_id,
                    is_active: true,
                })
            } else {
                Err(AppError::NotFound(format!("ledger account {id}")))
            }
        };
        let cost_centers = move |id: CostCenterId| -> AppResult<CostCenterRef> {
            Ok(CostCenterRef {
                id,
                business_id,
                is_active: true,
            })
        };
        (accounts, cost_centers)
    }

    fn line(account: LedgerAccountId, debit: Decimal, credit: Decimal) -> VoucherItemInput {
        VoucherItemInput {
            id: None,
            ledger_account_id: account,
            cost_center_id: None,
            debit_amount: debit,
            credit_amount: credit,
            narration: None,
        }
    }

    fn create_input(fixture: &Fixture, items: Vec<VoucherItemInput>) -> CreateVoucherInput {
        CreateVoucherInput {
            business_id: fixture.business_id,
            voucher_type_id: fixture.voucher_type.id,
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            party_id: None,
            narration: Some("Cash sale".to_string()),
            reference: None,
            voucher_number: None,
            is_posted: true,
            items,
            created_by: UserId::new(),
        }
    }

    #[test]
    fn test_create_posted_voucher_generates_journal() {
        let fx = fixture();
        let (accounts, cost_centers) = lookups(&fx);
        let input = create_input(
            &fx,
            vec![
                line(fx.cash, dec!(500), dec!(0)),
                line(fx.sales, dec!(0), dec!(500)),
            ],
        );

        let plan = VoucherService::plan_create(
            &input,
            &fx.voucher_type,
            &fx.year,
            "RV-0001".to_string(),
            false,
            accounts,
            cost_centers,
        )
        .unwrap();

        assert_eq!(plan.voucher.total_amount, dec!(500));
        assert_eq!(plan.items.len(), 2);
        assert_eq!(plan.items[0].sequence, 1);
        assert_eq!(plan.items[1].sequence, 2);
        assert_eq!(plan.journal.len(), 2);
        assert_eq!(plan.journal[0].debit_amount, dec!(500));
        assert_eq!(plan.journal[1].credit_amount, dec!(500));
    }

    #[test]
    fn test_create_draft_has_no_journal() {
        let fx = fixture();
        let (accounts, cost_centers) = lookups(&fx);
        let mut input = create_input(
            &fx,
            vec![
                line(fx.cash, dec!(100), dec!(0)),
                line(fx.sales, dec!(0), dec!(100)),
            ],
        );
        input.is_posted = false;

        let plan = VoucherService::plan_create(
            &input,
            &fx.voucher_type,
            &fx.year,
            "RV-0002".to_string(),
            false,
            accounts,
            cost_centers,
        )
        .unwrap();
        assert!(plan.journal.is_empty());
    }

    #[test]
    fn test_create_imbalanced_fails() {
        let fx = fixture();
        let (accounts, cost_centers) = lookups(&fx);
        let input = create_input(
            &fx,
            vec![
                line(fx.cash, dec!(500), dec!(0)),
                line(fx.sales, dec!(0), dec!(400)),
            ],
        );

        let err = VoucherService::plan_create(
            &input,
            &fx.voucher_type,
            &fx.year,
            "RV-0001".to_string(),
            false,
            accounts,
            cost_centers,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::ImbalancedVoucher { .. }));
    }

    #[test]
    fn test_create_in_locked_year_fails() {
        let mut fx = fixture();
        fx.year.is_locked = true;
        let (accounts, cost_centers) = lookups(&fx);
        let input = create_input(
            &fx,
            vec![
                line(fx.cash, dec!(500), dec!(0)),
                line(fx.sales, dec!(0), dec!(500)),
            ],
        );

        let err = VoucherService::plan_create(
            &input,
            &fx.voucher_type,
            &fx.year,
            "RV-0001".to_string(),
            false,
            accounts,
            cost_centers,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::LockedPeriod(_)));
    }

    #[test]
    fn test_create_duplicate_number_fails() {
        let fx = fixture();
        let (accounts, cost_centers) = lookups(&fx);
        let input = create_input(
            &fx,
            vec![
                line(fx.cash, dec!(500), dec!(0)),
                line(fx.sales, dec!(0), dec!(500)),
            ],
        );

        let err = VoucherService::plan_create(
            &input,
            &fx.voucher_type,
            &fx.year,
            "RV-0001".to_string(),
            true,
            accounts,
            cost_centers,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::DuplicateVoucherNumber(_)));
    }

    #[test]
    fn test_create_foreign_account_fails() {
        let fx = fixture();
        let foreign_business = BusinessId::new();
        let accounts = move |id: LedgerAccountId| -> AppResult<AccountRef> {
            Ok(AccountRef {
                id,
                business_id: foreign_business,
                is_active: true,
            })
        };
        let (_, cost_centers) = lookups(&fx);
        let input = create_input(
            &fx,
            vec![
                line(fx.cash, dec!(500), dec!(0)),
                line(fx.sales, dec!(0), dec!(500)),
            ],
        );

        let err = VoucherService::plan_create(
            &input,
            &fx.voucher_type,
            &fx.year,
            "RV-0001".to_string(),
            false,
            accounts,
            cost_centers,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::CrossTenant));
    }

    #[test]
    fn test_create_inactive_account_fails() {
        let fx = fixture();
        let business_id = fx.business_id;
        let accounts = move |id: LedgerAccountId| -> AppResult<AccountRef> {
            Ok(AccountRef {
                id,
                business_id,
                is_active: false,
            })
        };
        let (_, cost_centers) = lookups(&fx);
        let input = create_input(
            &fx,
            vec![
                line(fx.cash, dec!(500), dec!(0)),
                line(fx.sales, dec!(0), dec!(500)),
            ],
        );

        let err = VoucherService::plan_create(
            &input,
            &fx.voucher_type,
            &fx.year,
            "RV-0001".to_string(),
            false,
            accounts,
            cost_centers,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    fn created_plan(fx: &Fixture) -> VoucherWritePlan {
        let (accounts, cost_centers) = lookups(fx);
        let input = create_input(
            fx,
            vec![
                line(fx.cash, dec!(500), dec!(0)),
                line(fx.sales, dec!(0), dec!(500)),
            ],
        );
        VoucherService::plan_create(
            &input,
            &fx.voucher_type,
            &fx.year,
            "RV-0001".to_string(),
            false,
            accounts,
            cost_centers,
        )
        .unwrap()
    }

    #[test]
    fn test_update_diffs_items_by_id() {
        let fx = fixture();
        let plan = created_plan(&fx);
        let (accounts, cost_centers) = lookups(&fx);

        // Keep the cash line (edited to 600), drop the sales line, add a
        // fresh credit line.
        let input = UpdateVoucherInput {
            date: plan.voucher.date,
            party_id: None,
            narration: plan.voucher.narration.clone(),
            reference: None,
            items: vec![
                VoucherItemInput {
                    id: Some(plan.items[0].id),
                    ledger_account_id: fx.cash,
                    cost_center_id: None,
                    debit_amount: dec!(600),
                    credit_amount: dec!(0),
                    narration: None,
                },
                line(fx.sales, dec!(0), dec!(600)),
            ],
            updated_by: UserId::new(),
        };

        let update = VoucherService::plan_update(
            &plan.voucher,
            &plan.items,
            &input,
            &fx.year,
            &fx.year,
            accounts,
            cost_centers,
        )
        .unwrap();

        assert_eq!(update.updated_items.len(), 1);
        assert_eq!(update.updated_items[0].id, plan.items[0].id);
        assert_eq!(update.updated_items[0].debit_amount, dec!(600));
        assert_eq!(update.inserted_items.len(), 1);
        assert_eq!(update.deleted_item_ids, vec![plan.items[1].id]);
        assert_eq!(update.voucher.total_amount, dec!(600));
        // Posted voucher: journal regenerated for the full new item set.
        assert_eq!(update.journal.len(), 2);
    }

    #[test]
    fn test_update_unknown_item_id_fails() {
        let fx = fixture();
        let plan = created_plan(&fx);
        let (accounts, cost_centers) = lookups(&fx);

        let input = UpdateVoucherInput {
            date: plan.voucher.date,
            party_id: None,
            narration: None,
            reference: None,
            items: vec![
                VoucherItemInput {
                    id: Some(VoucherItemId::new()),
                    ledger_account_id: fx.cash,
                    cost_center_id: None,
                    debit_amount: dec!(500),
                    credit_amount: dec!(0),
                    narration: None,
                },
                line(fx.sales, dec!(0), dec!(500)),
            ],
            updated_by: UserId::new(),
        };

        let err = VoucherService::plan_update(
            &plan.voucher,
            &plan.items,
            &input,
            &fx.year,
            &fx.year,
            accounts,
            cost_centers,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_update_draft_leaves_no_journal() {
        let fx = fixture();
        let mut plan = created_plan(&fx);
        plan.voucher.is_posted = false;
        let (accounts, cost_centers) = lookups(&fx);

        let input = UpdateVoucherInput {
            date: plan.voucher.date,
            party_id: None,
            narration: None,
            reference: None,
            items: vec![
                line(fx.cash, dec!(100), dec!(0)),
                line(fx.sales, dec!(0), dec!(100)),
            ],
            updated_by: UserId::new(),
        };

        let update = VoucherService::plan_update(
            &plan.voucher,
            &plan.items,
            &input,
            &fx.year,
            &fx.year,
            accounts,
            cost_centers,
        )
        .unwrap();
        assert!(update.journal.is_empty());
    }

    #[test]
    fn test_update_into_locked_target_year_fails() {
        let fx = fixture();
        let plan = created_plan(&fx);
        let (accounts, cost_centers) = lookups(&fx);

        let locked_next = FinancialYear {
            id: FinancialYearId::new(),
            business_id: fx.business_id,
            name: "FY 2026".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            is_current: false,
            is_locked: true,
        };

        let input = UpdateVoucherInput {
            date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            party_id: None,
            narration: None,
            reference: None,
            items: vec![
                line(fx.cash, dec!(500), dec!(0)),
                line(fx.sales, dec!(0), dec!(500)),
            ],
            updated_by: UserId::new(),
        };

        let err = VoucherService::plan_update(
            &plan.voucher,
            &plan.items,
            &input,
            &fx.year,
            &locked_next,
            accounts,
            cost_centers,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::LockedPeriod(_)));
    }

    #[test]
    fn test_post_and_unpost_guards() {
        let fx = fixture();
        let plan = created_plan(&fx);

        // Already posted: posting again fails.
        assert!(matches!(
            VoucherService::plan_post(&plan.voucher, &plan.items, &fx.year),
            Err(AppError::Validation(_))
        ));
        // Unposting a posted voucher is fine.
        assert!(VoucherService::plan_unpost(&plan.voucher, &fx.year).is_ok());

        let mut draft = plan.voucher.clone();
        draft.is_posted = false;
        // Draft: posting generates entries, unposting fails.
        let journal = VoucherService::plan_post(&draft, &plan.items, &fx.year).unwrap();
        assert_eq!(journal.len(), 2);
        assert!(matches!(
            VoucherService::plan_unpost(&draft, &fx.year),
            Err(AppError::Validation(_))
        ));

        // Locked year blocks both directions and deletion.
        let mut locked = fx.year.clone();
        locked.is_locked = true;
        assert!(matches!(
            VoucherService::plan_post(&draft, &plan.items, &locked),
            Err(AppError::LockedPeriod(_))
        ));
        assert!(matches!(
            VoucherService::plan_unpost(&plan.voucher, &locked),
            Err(AppError::LockedPeriod(_))
        ));
        assert!(matches!(
            VoucherService::plan_delete(&plan.voucher, &locked),
            Err(AppError::LockedPeriod(_))
        ));
        assert!(VoucherService::plan_delete(&plan.voucher, &fx.year).is_ok());
    }
}
