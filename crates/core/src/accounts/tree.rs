//! Account-group and cost-center tree traversal and rules.
//!
//! Both hierarchies are held as an arena of nodes keyed by id with explicit
//! parent ids. All traversal (flattening, descendant sets, cycle checks)
//! walks the arena; nothing relies on cyclic object graphs, so a corrupt
//! parent pointer can never hang a traversal.

use std::collections::{HashMap, HashSet};

use kontu_shared::types::{AccountGroupId, CostCenterId};
use kontu_shared::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use super::types::{AccountGroup, AccountNature, CostCenter};

/// One row of a flattened hierarchy, for indentation-aware selection lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatNode<Id> {
    /// Node id.
    pub id: Id,
    /// Node name.
    pub name: String,
    /// Depth below the roots (roots are 0).
    pub depth: usize,
}

/// Arena over a business's account groups.
#[derive(Debug, Clone)]
pub struct GroupTree {
    nodes: HashMap<AccountGroupId, AccountGroup>,
    children: HashMap<Option<AccountGroupId>, Vec<AccountGroupId>>,
}

impl GroupTree {
    /// Builds the arena from the full row set of one business.
    ///
    /// Siblings are ordered by `sequence`, then `name`.
    #[must_use]
    pub fn from_rows(rows: Vec<AccountGroup>) -> Self {
        let mut children: HashMap<Option<AccountGroupId>, Vec<AccountGroupId>> = HashMap::new();
        for row in &rows {
            children.entry(row.parent_id).or_default().push(row.id);
        }

        let nodes: HashMap<AccountGroupId, AccountGroup> =
            rows.into_iter().map(|row| (row.id, row)).collect();

        for ids in children.values_mut() {
            ids.sort_by(|a, b| {
                let a = &nodes[a];
                let b = &nodes[b];
                a.sequence.cmp(&b.sequence).then_with(|| a.name.cmp(&b.name))
            });
        }

        Self { nodes, children }
    }

    /// Looks up a group by id.
    #[must_use]
    pub fn get(&self, id: AccountGroupId) -> Option<&AccountGroup> {
        self.nodes.get(&id)
    }

    /// Direct children of a group.
    #[must_use]
    pub fn children_of(&self, id: AccountGroupId) -> &[AccountGroupId] {
        self.children.get(&Some(id)).map_or(&[], Vec::as_slice)
    }

    /// Returns true if the group has at least one child.
    #[must_use]
    pub fn has_children(&self, id: AccountGroupId) -> bool {
        !self.children_of(id).is_empty()
    }

    /// Pre-order flattening of the whole tree: (id, name, depth) rows,
    /// depth-first, siblings in `sequence`-then-`name` order.
    #[must_use]
    pub fn flatten(&self) -> Vec<FlatNode<AccountGroupId>> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut visited = HashSet::new();
        let roots = self.children.get(&None).cloned().unwrap_or_default();
        for root in roots {
            self.flatten_into(root, 0, &mut out, &mut visited);
        }
        out
    }

    fn flatten_into(
        &self,
        id: AccountGroupId,
        depth: usize,
        out: &mut Vec<FlatNode<AccountGroupId>>,
        visited: &mut HashSet<AccountGroupId>,
    ) {
        if !visited.insert(id) {
            return;
        }
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        out.push(FlatNode {
            id,
            name: node.name.clone(),
            depth,
        });
        for child in self.children_of(id).to_vec() {
            self.flatten_into(child, depth + 1, out, visited);
        }
    }

    /// The subtree rooted at `id`, pre-order, the root itself included.
    #[must_use]
    pub fn subtree(&self, id: AccountGroupId) -> Vec<AccountGroupId> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) || !self.nodes.contains_key(&current) {
                continue;
            }
            out.push(current);
            // Reverse so pop order preserves sibling order.
            for child in self.children_of(current).iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// All descendants of `id`, the node itself excluded.
    #[must_use]
    pub fn descendant_set(&self, id: AccountGroupId) -> HashSet<AccountGroupId> {
        self.subtree(id)
            .into_iter()
            .filter(|candidate| *candidate != id)
            .collect()
    }

    /// Validates that a new group can be created under `parent_id` with the
    /// supplied nature.
    ///
    /// # Errors
    ///
    /// `NotFound` when the parent does not exist, `Validation` when the
    /// parent's nature differs from the supplied nature.
    pub fn validate_new_group(
        &self,
        parent_id: Option<AccountGroupId>,
        nature: AccountNature,
    ) -> AppResult<()> {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };
        let parent = self
            .nodes
            .get(&parent_id)
            .ok_or_else(|| AppError::NotFound(format!("account group {parent_id}")))?;
        if parent.nature != nature {
            return Err(AppError::Validation(format!(
                "group nature {nature} does not match parent nature {}",
                parent.nature
            )));
        }
        Ok(())
    }

    /// Validates moving `group_id` under `new_parent_id`.
    ///
    /// A node may not become a child of itself or of any of its own
    /// descendants; that would cut the subtree loose as a cycle.
    ///
    /// # Errors
    ///
    /// `NotFound` for missing nodes, `Validation` for system groups,
    /// self/descendant parents, and nature mismatches.
    pub fn validate_reparent(
        &self,
        group_id: AccountGroupId,
        new_parent_id: Option<AccountGroupId>,
    ) -> AppResult<()> {
        let group = self
            .nodes
            .get(&group_id)
            .ok_or_else(|| AppError::NotFound(format!("account group {group_id}")))?;
        if group.is_system {
            return Err(AppError::Validation(
                "system account groups cannot be moved".to_string(),
            ));
        }
        let Some(new_parent_id) = new_parent_id else {
            return Ok(());
        };
        if new_parent_id == group_id {
            return Err(AppError::Validation(
                "a group cannot be its own parent".to_string(),
            ));
        }
        if self.descendant_set(group_id).contains(&new_parent_id) {
            return Err(AppError::Validation(
                "a group cannot be moved under one of its own descendants".to_string(),
            ));
        }
        let parent = self
            .nodes
            .get(&new_parent_id)
            .ok_or_else(|| AppError::NotFound(format!("account group {new_parent_id}")))?;
        if parent.nature != group.nature {
            return Err(AppError::Validation(format!(
                "group nature {} does not match parent nature {}",
                group.nature, parent.nature
            )));
        }
        Ok(())
    }

    /// Plans a nature change: returns every group id whose nature must
    /// become `new_nature` (the group itself plus all descendants,
    /// depth-first). The caller applies the whole set in one transaction.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing group, `Validation` for system groups.
    pub fn cascade_nature(
        &self,
        group_id: AccountGroupId,
        new_nature: AccountNature,
    ) -> AppResult<Vec<AccountGroupId>> {
        let group = self
            .nodes
            .get(&group_id)
            .ok_or_else(|| AppError::NotFound(format!("account group {group_id}")))?;
        if group.is_system {
            return Err(AppError::Validation(
                "system account groups cannot be edited".to_string(),
            ));
        }
        if group.nature == new_nature {
            return Ok(Vec::new());
        }
        Ok(self.subtree(group_id))
    }

    /// Validates deleting a group.
    ///
    /// # Errors
    ///
    /// `Conflict` while the group still has children or ledger accounts,
    /// `Validation` for system groups, `NotFound` for missing ones.
    pub fn validate_delete(
        &self,
        group_id: AccountGroupId,
        has_ledger_accounts: bool,
    ) -> AppResult<()> {
        let group = self
            .nodes
            .get(&group_id)
            .ok_or_else(|| AppError::NotFound(format!("account group {group_id}")))?;
        if group.is_system {
            return Err(AppError::Validation(
                "system account groups cannot be deleted".to_string(),
            ));
        }
        if self.has_children(group_id) {
            return Err(AppError::Conflict(
                "account group still has child groups".to_string(),
            ));
        }
        if has_ledger_accounts {
            return Err(AppError::Conflict(
                "account group still has ledger accounts".to_string(),
            ));
        }
        Ok(())
    }
}

/// Arena over a business's cost centers.
///
/// Same mechanics as [`GroupTree`] without the nature rule; siblings are
/// ordered by code.
#[derive(Debug, Clone)]
pub struct CostCenterTree {
    nodes: HashMap<CostCenterId, CostCenter>,
    children: HashMap<Option<CostCenterId>, Vec<CostCenterId>>,
}

impl CostCenterTree {
    /// Builds the arena from the full row set of one business.
    #[must_use]
    pub fn from_rows(rows: Vec<CostCenter>) -> Self {
        let mut children: HashMap<Option<CostCenterId>, Vec<CostCenterId>> = HashMap::new();
        for row in &rows {
            children.entry(row.parent_id).or_default().push(row.id);
        }
        let nodes: HashMap<CostCenterId, CostCenter> =
            rows.into_iter().map(|row| (row.id, row)).collect();
        for ids in children.values_mut() {
            ids.sort_by(|a, b| nodes[a].code.cmp(&nodes[b].code));
        }
        Self { nodes, children }
    }

    /// Looks up a cost center by id.
    #[must_use]
    pub fn get(&self, id: CostCenterId) -> Option<&CostCenter> {
        self.nodes.get(&id)
    }

    fn children_of(&self, id: CostCenterId) -> &[CostCenterId] {
        self.children.get(&Some(id)).map_or(&[], Vec::as_slice)
    }

    /// Pre-order flattening for selection lists.
    #[must_use]
    pub fn flatten(&self) -> Vec<FlatNode<CostCenterId>> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut visited = HashSet::new();
        let mut stack: Vec<(CostCenterId, usize)> = self
            .children
            .get(&None)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .rev()
            .map(|id| (id, 0))
            .collect();
        while let Some((id, depth)) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            out.push(FlatNode {
                id,
                name: node.name.clone(),
                depth,
            });
            for child in self.children_of(id).iter().rev() {
                stack.push((*child, depth + 1));
            }
        }
        out
    }

    /// All descendants of `id`, the node itself excluded.
    #[must_use]
    pub fn descendant_set(&self, id: CostCenterId) -> HashSet<CostCenterId> {
        let mut out = HashSet::new();
        let mut stack: Vec<CostCenterId> = self.children_of(id).to_vec();
        while let Some(current) = stack.pop() {
            if !out.insert(current) {
                continue;
            }
            stack.extend_from_slice(self.children_of(current));
        }
        out
    }

    /// Validates moving `id` under `new_parent_id` (cycle check).
    ///
    /// # Errors
    ///
    /// `NotFound` for missing nodes, `Validation` for self/descendant
    /// parents.
    pub fn validate_reparent(
        &self,
        id: CostCenterId,
        new_parent_id: Option<CostCenterId>,
    ) -> AppResult<()> {
        if !self.nodes.contains_key(&id) {
            return Err(AppError::NotFound(format!("cost center {id}")));
        }
        let Some(new_parent_id) = new_parent_id else {
            return Ok(());
        };
        if new_parent_id == id {
            return Err(AppError::Validation(
                "a cost center cannot be its own parent".to_string(),
            ));
        }
        if self.descendant_set(id).contains(&new_parent_id) {
            return Err(AppError::Validation(
                "a cost center cannot be moved under one of its own descendants".to_string(),
            ));
        }
        if !self.nodes.contains_key(&new_parent_id) {
            return Err(AppError::NotFound(format!("cost center {new_parent_id}")));
        }
        Ok(())
    }

    /// Validates deleting a cost center.
    ///
    /// # Errors
    ///
    /// `Conflict` while it has children or tagged transactions.
    pub fn validate_delete(&self, id: CostCenterId, has_transactions: bool) -> AppResult<()> {
        if !self.nodes.contains_key(&id) {
            return Err(AppError::NotFound(format!("cost center {id}")));
        }
        if !self.children_of(id).is_empty() {
            return Err(AppError::Conflict(
                "cost center still has child cost centers".to_string(),
            ));
        }
        if has_transactions {
            return Err(AppError::Conflict(
                "cost center is referenced by transactions".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kontu_shared::types::BusinessId;

    fn group(
        business: BusinessId,
        parent: Option<AccountGroupId>,
        name: &str,
        nature: AccountNature,
        sequence: i32,
    ) -> AccountGroup {
        AccountGroup {
            id: AccountGroupId::new(),
            business_id: business,
            parent_id: parent,
            name: name.to_string(),
            nature,
            affects_gross_profit: false,
            sequence,
            is_system: false,
        }
    }

    /// Assets
    ///   Current Assets
    ///     Bank Accounts
    ///   Fixed Assets
    /// Income
    fn sample_tree() -> (GroupTree, Vec<AccountGroupId>) {
        let business = BusinessId::new();
        let assets = group(business, None, "Assets", AccountNature::Assets, 1);
        let income = group(business, None, "Income", AccountNature::Income, 2);
        let current = group(
            business,
            Some(assets.id),
            "Current Assets",
            AccountNature::Assets,
            1,
        );
        let fixed = group(
            business,
            Some(assets.id),
            "Fixed Assets",
            AccountNature::Assets,
            2,
        );
        let bank = group(
            business,
            Some(current.id),
            "Bank Accounts",
            AccountNature::Assets,
            1,
        );
        let ids = vec![assets.id, current.id, bank.id, fixed.id, income.id];
        (
            GroupTree::from_rows(vec![assets, income, current, fixed, bank]),
            ids,
        )
    }

    #[test]
    fn test_flatten_preorder_with_depth() {
        let (tree, ids) = sample_tree();
        let flat = tree.flatten();
        let got: Vec<(AccountGroupId, usize)> = flat.iter().map(|n| (n.id, n.depth)).collect();
        assert_eq!(
            got,
            vec![
                (ids[0], 0), // Assets
                (ids[1], 1), // Current Assets
                (ids[2], 2), // Bank Accounts
                (ids[3], 1), // Fixed Assets
                (ids[4], 0), // Income
            ]
        );
    }

    #[test]
    fn test_siblings_ordered_by_sequence_then_name() {
        let business = BusinessId::new();
        let root = group(business, None, "Expense", AccountNature::Expense, 1);
        let b = group(business, Some(root.id), "Bravo", AccountNature::Expense, 5);
        let a = group(business, Some(root.id), "Alpha", AccountNature::Expense, 5);
        let first = group(business, Some(root.id), "Zulu", AccountNature::Expense, 1);
        let tree = GroupTree::from_rows(vec![root.clone(), b.clone(), a.clone(), first.clone()]);

        let names: Vec<String> = tree.flatten().into_iter().map(|n| n.name).collect();
        assert_eq!(names, vec!["Expense", "Zulu", "Alpha", "Bravo"]);
    }

    #[test]
    fn test_new_group_nature_must_match_parent() {
        let (tree, ids) = sample_tree();
        assert!(tree
            .validate_new_group(Some(ids[0]), AccountNature::Assets)
            .is_ok());
        let err = tree
            .validate_new_group(Some(ids[4]), AccountNature::Assets)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_new_root_group_allowed() {
        let (tree, _) = sample_tree();
        assert!(tree.validate_new_group(None, AccountNature::Equity).is_ok());
    }

    #[test]
    fn test_reparent_cycle_rejected() {
        let (tree, ids) = sample_tree();
        // Assets under Bank Accounts: Bank Accounts is a descendant of Assets.
        let err = tree.validate_reparent(ids[0], Some(ids[2])).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Self-parent.
        let err = tree.validate_reparent(ids[1], Some(ids[1])).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_reparent_nature_mismatch_rejected() {
        let (tree, ids) = sample_tree();
        let err = tree.validate_reparent(ids[3], Some(ids[4])).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_reparent_valid_move() {
        let (tree, ids) = sample_tree();
        // Fixed Assets under Current Assets.
        assert!(tree.validate_reparent(ids[3], Some(ids[1])).is_ok());
    }

    #[test]
    fn test_cascade_returns_whole_subtree() {
        let (tree, ids) = sample_tree();
        let affected = tree
            .cascade_nature(ids[0], AccountNature::Liabilities)
            .unwrap();
        assert_eq!(affected, vec![ids[0], ids[1], ids[2], ids[3]]);
    }

    #[test]
    fn test_cascade_noop_when_nature_unchanged() {
        let (tree, ids) = sample_tree();
        let affected = tree.cascade_nature(ids[0], AccountNature::Assets).unwrap();
        assert!(affected.is_empty());
    }

    #[test]
    fn test_cascade_rejects_system_group() {
        let business = BusinessId::new();
        let mut root = group(business, None, "Assets", AccountNature::Assets, 1);
        root.is_system = true;
        let id = root.id;
        let tree = GroupTree::from_rows(vec![root]);
        let err = tree
            .cascade_nature(id, AccountNature::Liabilities)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_delete_guards() {
        let (tree, ids) = sample_tree();
        // Has children.
        assert!(matches!(
            tree.validate_delete(ids[0], false),
            Err(AppError::Conflict(_))
        ));
        // Leaf with accounts attached.
        assert!(matches!(
            tree.validate_delete(ids[2], true),
            Err(AppError::Conflict(_))
        ));
        // Deletable leaf.
        assert!(tree.validate_delete(ids[2], false).is_ok());
    }

    #[test]
    fn test_corrupt_parent_pointer_is_bounded() {
        // Two nodes pointing at each other must not hang traversal.
        let business = BusinessId::new();
        let mut a = group(business, None, "A", AccountNature::Assets, 1);
        let mut b = group(business, None, "B", AccountNature::Assets, 2);
        b.parent_id = Some(a.id);
        a.parent_id = Some(b.id);
        let a_id = a.id;
        let tree = GroupTree::from_rows(vec![a, b]);
        // No roots -> nothing reachable from flatten.
        assert!(tree.flatten().is_empty());
        // Subtree terminates thanks to the visited set.
        assert!(!tree.subtree(a_id).is_empty());
    }

    #[test]
    fn test_cost_center_tree_cycle_and_delete() {
        let business = BusinessId::new();
        let root = CostCenter {
            id: CostCenterId::new(),
            business_id: business,
            parent_id: None,
            name: "Operations".to_string(),
            code: "OPS".to_string(),
            is_active: true,
        };
        let child = CostCenter {
            id: CostCenterId::new(),
            business_id: business,
            parent_id: Some(root.id),
            name: "Logistics".to_string(),
            code: "OPS-LOG".to_string(),
            is_active: true,
        };
        let (root_id, child_id) = (root.id, child.id);
        let tree = CostCenterTree::from_rows(vec![root, child]);

        assert!(matches!(
            tree.validate_reparent(root_id, Some(child_id)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            tree.validate_delete(root_id, false),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            tree.validate_delete(child_id, true),
            Err(AppError::Conflict(_))
        ));
        assert!(tree.validate_delete(child_id, false).is_ok());

        let flat = tree.flatten();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].depth, 0);
        assert_eq!(flat[1].depth, 1);
    }
}
