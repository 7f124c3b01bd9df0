//! Materializing due recurring transactions into vouchers.

use chrono::NaiveDate;
use kontu_shared::types::{CostCenterId, LedgerAccountId, UserId};
use kontu_shared::{AppError, AppResult};

use super::schedule;
use super::types::{RecurringTransaction, TemplateItem};
use crate::fiscal::FinancialYear;
use crate::voucher::service::{AccountRef, CostCenterRef, VoucherService, VoucherWritePlan};
use crate::voucher::types::{CreateVoucherInput, VoucherItemInput, VoucherTotals, VoucherType};
use crate::voucher::validation::validate_items;

/// Recurring transaction service.
pub struct RecurringService;

impl RecurringService {
    /// Validates that a template is balanced.
    ///
    /// # Errors
    ///
    /// Same families as voucher item validation: `Validation` for
    /// malformed lines, `ImbalancedVoucher` for an unbalanced template.
    pub fn validate_template(template: &[TemplateItem]) -> AppResult<VoucherTotals> {
        validate_items(&Self::template_inputs(template))
    }

    /// Builds the write plan for a due recurring transaction: a voucher
    /// dated at the due date, posted immediately, items copied from the
    /// template.
    ///
    /// The template is re-validated at generation time; a template that
    /// has drifted out of balance, or that references an inactive
    /// account, yields an error and no voucher.
    ///
    /// # Errors
    ///
    /// `Validation` when the schedule is not due (inactive or exhausted),
    /// plus every error family of
    /// [`VoucherService::plan_create`].
    #[allow(clippy::too_many_arguments)]
    pub fn plan_voucher<A, C>(
        recurring: &RecurringTransaction,
        voucher_type: &VoucherType,
        year: &FinancialYear,
        voucher_number: String,
        number_exists: bool,
        today: NaiveDate,
        generated_by: UserId,
        account_lookup: A,
        cost_center_lookup: C,
    ) -> AppResult<(VoucherWritePlan, NaiveDate)>
    where
        A: Fn(LedgerAccountId) -> AppResult<AccountRef>,
        C: Fn(CostCenterId) -> AppResult<CostCenterRef>,
    {
        if !schedule::is_due(recurring, today) {
            return Err(AppError::Validation(format!(
                "recurring transaction {} is not due",
                recurring.name
            )));
        }
        let due_date = schedule::next_due_date(recurring).ok_or_else(|| {
            AppError::Validation(format!(
                "recurring transaction {} is exhausted",
                recurring.name
            ))
        })?;

        let input = CreateVoucherInput {
            business_id: recurring.business_id,
            voucher_type_id: recurring.voucher_type_id,
            date: due_date,
            party_id: None,
            narration: recurring.narration.clone(),
            reference: Some(recurring.name.clone()),
            voucher_number: None,
            is_posted: true,
            items: Self::template_inputs(&recurring.template),
            created_by: generated_by,
        };

        let plan = VoucherService::plan_create(
            &input,
            voucher_type,
            year,
            voucher_number,
            number_exists,
            account_lookup,
            cost_center_lookup,
        )?;

        Ok((plan, due_date))
    }

    fn template_inputs(template: &[TemplateItem]) -> Vec<VoucherItemInput> {
        template
            .iter()
            .map(|item| VoucherItemInput {
                id: None,
                ledger_account_id: item.ledger_account_id,
                cost_center_id: item.cost_center_id,
                debit_amount: item.debit_amount,
                credit_amount: item.credit_amount,
                narration: None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voucher::types::VoucherNature;
    use kontu_shared::types::{BusinessId, FinancialYearId, RecurringTransactionId, VoucherTypeId};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn template_line(
        account: LedgerAccountId,
        debit: Decimal,
        credit: Decimal,
    ) -> TemplateItem {
        TemplateItem {
            ledger_account_id: account,
            cost_center_id: None,
            debit_amount: debit,
            credit_amount: credit,
        }
    }

    fn fixture() -> (RecurringTransaction, VoucherType, FinancialYear) {
        let business_id = BusinessId::new();
        let rent = LedgerAccountId::new();
        let bank = LedgerAccountId::new();
        let recurring = RecurringTransaction {
            id: RecurringTransactionId::new(),
            business_id,
            voucher_type_id: VoucherTypeId::new(),
            name: "Office rent".to_string(),
            frequency: crate::recurring::types::Frequency::Monthly,
            day_of_month: Some(1),
            day_of_week: None,
            month: None,
            start_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: None,
            occurrences: None,
            occurrences_generated: 0,
            narration: Some("Monthly rent".to_string()),
            template: vec![
                template_line(rent, dec!(1500), dec!(0)),
                template_line(bank, dec!(0), dec!(1500)),
            ],
            is_active: true,
        };
        let voucher_type = VoucherType {
            id: recurring.voucher_type_id,
            business_id,
            name: "Payment Voucher".to_string(),
            code: "PV".to_string(),
            nature: VoucherNature::Payment,
            prefix: Some("PV-".to_string()),
            auto_increment: true,
            starting_number: 1,
            is_system: true,
        };
        let year = FinancialYear {
            id: FinancialYearId::new(),
            business_id,
            name: "FY 2025".to_string(),
            start_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: chrono::NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            is_current: true,
            is_locked: false,
        };
        (recurring, voucher_type, year)
    }

    fn lookups(
        business_id: BusinessId,
        active: bool,
    ) -> (
        impl Fn(LedgerAccountId) -> AppResult<AccountRef> + use<>,
        impl Fn(CostCenterId) -> AppResult<CostCenterRef> + use<>,
    ) {
        let accounts = move |id: LedgerAccountId| -> AppResult<AccountRef> {
            Ok(AccountRef {
                id,
                business_id,
                is_active: active,
            })
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

    #[test]
    fn test_balanced_template_validates() {
        let (recurring, _, _) = fixture();
        let totals = RecurringService::validate_template(&recurring.template).unwrap();
        assert_eq!(totals.debit, dec!(1500));
    }

    #[test]
    fn test_imbalanced_template_rejected() {
        let account = LedgerAccountId::new();
        let template = vec![
            template_line(account, dec!(100), dec!(0)),
            template_line(account, dec!(0), dec!(90)),
        ];
        assert!(matches!(
            RecurringService::validate_template(&template),
            Err(AppError::ImbalancedVoucher { .. })
        ));
    }

    #[test]
    fn test_plan_voucher_when_due() {
        let (recurring, voucher_type, year) = fixture();
        let (accounts, cost_centers) = lookups(recurring.business_id, true);

        let (plan, due_date) = RecurringService::plan_voucher(
            &recurring,
            &voucher_type,
            &year,
            "PV-0001".to_string(),
            false,
            chrono::NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            UserId::new(),
            accounts,
            cost_centers,
        )
        .unwrap();

        assert_eq!(due_date, chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(plan.voucher.date, due_date);
        assert!(plan.voucher.is_posted);
        assert_eq!(plan.journal.len(), 2);
        assert_eq!(plan.voucher.total_amount, dec!(1500));
        assert_eq!(plan.voucher.reference.as_deref(), Some("Office rent"));
    }

    #[test]
    fn test_plan_voucher_not_due_fails() {
        let (recurring, voucher_type, year) = fixture();
        let (accounts, cost_centers) = lookups(recurring.business_id, true);

        let err = RecurringService::plan_voucher(
            &recurring,
            &voucher_type,
            &year,
            "PV-0001".to_string(),
            false,
            chrono::NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            UserId::new(),
            accounts,
            cost_centers,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_plan_voucher_inactive_account_yields_no_voucher() {
        let (recurring, voucher_type, year) = fixture();
        let (accounts, cost_centers) = lookups(recurring.business_id, false);

        let err = RecurringService::plan_voucher(
            &recurring,
            &voucher_type,
            &year,
            "PV-0001".to_string(),
            false,
            chrono::NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            UserId::new(),
            accounts,
            cost_centers,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_inactive_schedule_never_generates() {
        let (mut recurring, voucher_type, year) = fixture();
        recurring.is_active = false;
        let (accounts, cost_centers) = lookups(recurring.business_id, true);

        let err = RecurringService::plan_voucher(
            &recurring,
            &voucher_type,
            &year,
            "PV-0001".to_string(),
            false,
            chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            UserId::new(),
            accounts,
            cost_centers,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
