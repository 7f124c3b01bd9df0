//! Receivable/payable aging.
//!
//! A party's outstanding balance is attributed to its vouchers oldest-first
//! (payments are already netted into the outstanding figure, so what the
//! attribution answers is "which invoices does the remainder sit on").
//! Boundary semantics are strict: an allocation aged exactly `periods[0]`
//! days is still `current`.

use chrono::NaiveDate;
use kontu_shared::types::PartyId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::voucher::types::VoucherNature;

/// Which side of the party ledger an aging run looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgingSide {
    /// Money owed to the business (customers).
    Receivable,
    /// Money the business owes (suppliers).
    Payable,
}

impl AgingSide {
    /// The signed effect of a voucher nature on this side's outstanding
    /// balance: positive increases what is owed, negative settles it,
    /// zero is irrelevant to this side.
    #[must_use]
    pub fn signed_amount(self, nature: VoucherNature, amount: Decimal) -> Decimal {
        match (self, nature) {
            (Self::Receivable, VoucherNature::Sales | VoucherNature::DebitNote)
            | (Self::Payable, VoucherNature::Purchase | VoucherNature::CreditNote) => amount,
            (Self::Receivable, VoucherNature::Receipt | VoucherNature::CreditNote)
            | (Self::Payable, VoucherNature::Payment | VoucherNature::DebitNote) => -amount,
            _ => Decimal::ZERO,
        }
    }
}

/// The voucher facts aging needs.
#[derive(Debug, Clone)]
pub struct AgingVoucher {
    /// Voucher date.
    pub date: NaiveDate,
    /// Nature of the voucher's type.
    pub nature: VoucherNature,
    /// Voucher total.
    pub amount: Decimal,
}

/// One aging bucket: amounts older than `over_days` (up to the next
/// boundary).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgingBucket {
    /// Lower boundary in days, exclusive.
    pub over_days: u32,
    /// Amount allocated to this bucket.
    pub amount: Decimal,
}

/// Aging report for one party and side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgingReport {
    /// The party reported on.
    pub party_id: PartyId,
    /// As-of date of the run.
    pub as_of: NaiveDate,
    /// Amount aged at most `periods[0]` days.
    pub current: Decimal,
    /// Intermediate buckets, one per boundary except the last.
    pub buckets: Vec<AgingBucket>,
    /// Amount aged beyond the last boundary.
    pub older: Decimal,
}

impl AgingReport {
    /// Sum across current, every bucket, and older.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.current
            + self
                .buckets
                .iter()
                .map(|bucket| bucket.amount)
                .sum::<Decimal>()
            + self.older
    }
}

/// A party's outstanding balance on one side as of a date: the sum of the
/// signed effect of every voucher dated on or before it.
#[must_use]
pub fn outstanding_balance(
    side: AgingSide,
    vouchers: &[AgingVoucher],
    as_of: NaiveDate,
) -> Decimal {
    vouchers
        .iter()
        .filter(|voucher| voucher.date <= as_of)
        .map(|voucher| side.signed_amount(voucher.nature, voucher.amount))
        .sum()
}

/// Allocates a party's outstanding balance into aging buckets.
///
/// Walks the vouchers oldest-first; each voucher's positive signed amount
/// consumes outstanding balance until it is exhausted, and the consumed
/// slice lands in the bucket its age falls in (strict `>` boundaries).
/// Settling vouchers (non-positive net) are skipped: their effect is
/// already inside `outstanding`. The bucket totals therefore always
/// conserve the outstanding balance.
#[must_use]
pub fn aging_buckets(
    party_id: PartyId,
    outstanding: Decimal,
    vouchers: &[AgingVoucher],
    as_of: NaiveDate,
    periods: &[u32],
    side: AgingSide,
) -> AgingReport {
    let mut report = AgingReport {
        party_id,
        as_of,
        current: Decimal::ZERO,
        buckets: periods
            .iter()
            .take(periods.len().saturating_sub(1))
            .map(|over_days| AgingBucket {
                over_days: *over_days,
                amount: Decimal::ZERO,
            })
            .collect(),
        older: Decimal::ZERO,
    };

    let mut sorted: Vec<&AgingVoucher> = vouchers
        .iter()
        .filter(|voucher| voucher.date <= as_of)
        .collect();
    sorted.sort_by_key(|voucher| voucher.date);

    let mut remaining = outstanding;
    for voucher in sorted {
        if remaining <= Decimal::ZERO {
            break;
        }
        let net = side.signed_amount(voucher.nature, voucher.amount);
        if net <= Decimal::ZERO {
            continue;
        }
        let allocated = net.min(remaining);
        remaining -= allocated;

        let age = (as_of - voucher.date).num_days();
        let slot = bucket_for(age, periods);
        match slot {
            BucketSlot::Current => report.current += allocated,
            BucketSlot::Over(index) => report.buckets[index].amount += allocated,
            BucketSlot::Older => report.older += allocated,
        }
    }

    report
}

enum BucketSlot {
    Current,
    Over(usize),
    Older,
}

/// Strict boundary classification: `current` while `age <= periods[0]`,
/// `older` once `age > periods.last()`, otherwise the bucket of the
/// largest boundary exceeded.
fn bucket_for(age: i64, periods: &[u32]) -> BucketSlot {
    let Some(first) = periods.first() else {
        return BucketSlot::Current;
    };
    if age <= i64::from(*first) {
        return BucketSlot::Current;
    }
    if let Some(last) = periods.last() {
        if age > i64::from(*last) {
            return BucketSlot::Older;
        }
    }
    let mut slot = 0;
    for (index, period) in periods.iter().enumerate() {
        if age > i64::from(*period) {
            slot = index;
        }
    }
    BucketSlot::Over(slot)
}
