//! Default chart of accounts and voucher types for a new business.
//!
//! Materialized once at business bootstrap, inside the same transaction
//! that creates the business row and its first financial year. The groups
//! created here are system groups: they cannot be edited or deleted.

use kontu_shared::types::{AccountGroupId, BusinessId};

use super::types::{AccountGroup, AccountNature};
use crate::voucher::types::{VoucherNature, VoucherType};

/// Well-known system group names, used by bootstrap and the party
/// registry (parties always back onto Accounts Receivable / Payable).
pub mod group_names {
    /// Root of the assets subtree.
    pub const ASSETS: &str = "Assets";
    /// Root of the liabilities subtree.
    pub const LIABILITIES: &str = "Liabilities";
    /// Root of the income subtree.
    pub const INCOME: &str = "Income";
    /// Root of the expense subtree.
    pub const EXPENSE: &str = "Expense";
    /// Root of the equity subtree.
    pub const EQUITY: &str = "Equity";
    /// Customer control group.
    pub const ACCOUNTS_RECEIVABLE: &str = "Accounts Receivable";
    /// Supplier control group.
    pub const ACCOUNTS_PAYABLE: &str = "Accounts Payable";
    /// Bank account group.
    pub const BANK_ACCOUNTS: &str = "Bank Accounts";
    /// Cash account group.
    pub const CASH_IN_HAND: &str = "Cash-in-hand";
}

/// The default chart of accounts: five nature roots plus the standard
/// system subgroups, in display order.
#[must_use]
pub fn default_account_groups(business_id: BusinessId) -> Vec<AccountGroup> {
    let mut groups = Vec::new();
    let mut sequence = 0;
    let mut root = |name: &str, nature: AccountNature| -> AccountGroupId {
        sequence += 1;
        let group = AccountGroup {
            id: AccountGroupId::new(),
            business_id,
            parent_id: None,
            name: name.to_string(),
            nature,
            affects_gross_profit: false,
            sequence,
            is_system: true,
        };
        let id = group.id;
        groups.push(group);
        id
    };

    let assets = root(group_names::ASSETS, AccountNature::Assets);
    let liabilities = root(group_names::LIABILITIES, AccountNature::Liabilities);
    let income = root(group_names::INCOME, AccountNature::Income);
    let expense = root(group_names::EXPENSE, AccountNature::Expense);
    root(group_names::EQUITY, AccountNature::Equity);

    let children: [(&str, AccountGroupId, AccountNature, bool); 12] = [
        ("Current Assets", assets, AccountNature::Assets, false),
        ("Fixed Assets", assets, AccountNature::Assets, false),
        (group_names::BANK_ACCOUNTS, assets, AccountNature::Assets, false),
        (group_names::CASH_IN_HAND, assets, AccountNature::Assets, false),
        (
            group_names::ACCOUNTS_RECEIVABLE,
            assets,
            AccountNature::Assets,
            false,
        ),
        (
            "Current Liabilities",
            liabilities,
            AccountNature::Liabilities,
            false,
        ),
        (
            group_names::ACCOUNTS_PAYABLE,
            liabilities,
            AccountNature::Liabilities,
            false,
        ),
        ("Duties & Taxes", liabilities, AccountNature::Liabilities, false),
        ("Sales", income, AccountNature::Income, true),
        ("Purchases", expense, AccountNature::Expense, true),
        ("Direct Expenses", expense, AccountNature::Expense, true),
        ("Indirect Expenses", expense, AccountNature::Expense, false),
    ];

    for (index, (name, parent, nature, affects_gross_profit)) in children.into_iter().enumerate() {
        groups.push(AccountGroup {
            id: AccountGroupId::new(),
            business_id,
            parent_id: Some(parent),
            name: name.to_string(),
            nature,
            affects_gross_profit,
            sequence: i32::try_from(index).unwrap_or(0) + 1,
            is_system: true,
        });
    }

    groups
}

/// The eight system voucher types, one per voucher nature.
#[must_use]
pub fn default_voucher_types(business_id: BusinessId) -> Vec<VoucherType> {
    let definitions: [(&str, &str, &str, VoucherNature); 8] = [
        ("Receipt Voucher", "RV", "RV-", VoucherNature::Receipt),
        ("Payment Voucher", "PV", "PV-", VoucherNature::Payment),
        ("Contra Voucher", "CV", "CV-", VoucherNature::Contra),
        ("Journal Voucher", "JV", "JV-", VoucherNature::Journal),
        ("Sales Invoice", "SI", "SI-", VoucherNature::Sales),
        ("Purchase Bill", "PB", "PB-", VoucherNature::Purchase),
        ("Debit Note", "DN", "DN-", VoucherNature::DebitNote),
        ("Credit Note", "CN", "CN-", VoucherNature::CreditNote),
    ];

    definitions
        .into_iter()
        .map(|(name, code, prefix, nature)| VoucherType {
            id: kontu_shared::types::VoucherTypeId::new(),
            business_id,
            name: name.to_string(),
            code: code.to_string(),
            nature,
            prefix: Some(prefix.to_string()),
            auto_increment: true,
            starting_number: 1,
            is_system: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::tree::GroupTree;
    use std::collections::HashSet;

    #[test]
    fn test_default_groups_form_a_valid_tree() {
        let groups = default_account_groups(BusinessId::new());
        let count = groups.len();
        let tree = GroupTree::from_rows(groups);
        // Every group is reachable from a root.
        assert_eq!(tree.flatten().len(), count);
    }

    #[test]
    fn test_default_groups_natures_consistent() {
        let groups = default_account_groups(BusinessId::new());
        let by_id: std::collections::HashMap<_, _> =
            groups.iter().map(|g| (g.id, g)).collect();
        for group in &groups {
            if let Some(parent_id) = group.parent_id {
                assert_eq!(group.nature, by_id[&parent_id].nature, "{}", group.name);
            }
        }
    }

    #[test]
    fn test_default_groups_include_party_controls() {
        let groups = default_account_groups(BusinessId::new());
        let names: HashSet<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert!(names.contains(group_names::ACCOUNTS_RECEIVABLE));
        assert!(names.contains(group_names::ACCOUNTS_PAYABLE));
        assert!(names.contains(group_names::BANK_ACCOUNTS));
        assert!(groups.iter().all(|g| g.is_system));
    }

    #[test]
    fn test_default_voucher_types_cover_all_natures() {
        let types = default_voucher_types(BusinessId::new());
        let natures: HashSet<_> = types.iter().map(|t| t.nature).collect();
        assert_eq!(natures.len(), 8);
        assert!(types.iter().all(|t| t.is_system && t.auto_increment));
    }
}
