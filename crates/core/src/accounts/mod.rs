//! Chart-of-accounts and cost-center hierarchies.
//!
//! Account groups form a self-referencing tree with a fixed accounting
//! nature per subtree. Ledger accounts are the leaves that journal entries
//! post against. Cost centers are an analogous, nature-free tagging tree.

pub mod defaults;
pub mod tree;
pub mod types;

pub use tree::{CostCenterTree, FlatNode, GroupTree};
pub use types::{AccountGroup, AccountNature, CostCenter, LedgerAccount};
