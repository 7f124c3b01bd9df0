//! Voucher numbering.
//!
//! Each voucher type drives its own sequence per financial year: the next
//! sequence is one past the highest existing number, never below the type's
//! `starting_number`. Auto-increment types render `prefix` + a zero-padded
//! sequence; manual types accept whatever the caller supplies.

use super::types::VoucherType;

/// Width of the zero-padded sequence in rendered numbers.
const SEQUENCE_WIDTH: usize = 4;

/// The next sequence number given the highest existing one in the
/// (type, financial year) scope.
#[must_use]
pub fn next_sequence(voucher_type: &VoucherType, max_existing: Option<i64>) -> i64 {
    match max_existing {
        Some(max) => (max + 1).max(voucher_type.starting_number),
        None => voucher_type.starting_number,
    }
}

/// Renders a sequence as a voucher number, e.g. `RV-0042`.
#[must_use]
pub fn format_number(voucher_type: &VoucherType, sequence: i64) -> String {
    let prefix = voucher_type.prefix.as_deref().unwrap_or("");
    format!("{prefix}{sequence:0width$}", width = SEQUENCE_WIDTH)
}

/// Extracts the sequence from a stored voucher number, if it matches the
/// type's numbering scheme. Manual numbers that do not parse yield `None`
/// and simply do not advance the sequence.
#[must_use]
pub fn parse_sequence(voucher_type: &VoucherType, voucher_number: &str) -> Option<i64> {
    let prefix = voucher_type.prefix.as_deref().unwrap_or("");
    voucher_number
        .strip_prefix(prefix)
        .and_then(|rest| rest.parse::<i64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voucher::types::VoucherNature;
    use kontu_shared::types::{BusinessId, VoucherTypeId};
    use rstest::rstest;

    fn receipt_type(prefix: Option<&str>, starting_number: i64) -> VoucherType {
        VoucherType {
            id: VoucherTypeId::new(),
            business_id: BusinessId::new(),
            name: "Receipt Voucher".to_string(),
            code: "RV".to_string(),
            nature: VoucherNature::Receipt,
            prefix: prefix.map(str::to_string),
            auto_increment: true,
            starting_number,
            is_system: true,
        }
    }

    #[rstest]
    #[case(None, 1)]
    #[case(Some(41), 42)]
    fn test_next_sequence(#[case] max: Option<i64>, #[case] expected: i64) {
        let vtype = receipt_type(Some("RV-"), 1);
        assert_eq!(next_sequence(&vtype, max), expected);
    }

    #[test]
    fn test_next_sequence_respects_starting_number() {
        let vtype = receipt_type(Some("RV-"), 1000);
        assert_eq!(next_sequence(&vtype, None), 1000);
        assert_eq!(next_sequence(&vtype, Some(5)), 1000);
        assert_eq!(next_sequence(&vtype, Some(1005)), 1006);
    }

    #[test]
    fn test_format_number() {
        let vtype = receipt_type(Some("RV-"), 1);
        assert_eq!(format_number(&vtype, 42), "RV-0042");
        assert_eq!(format_number(&vtype, 12345), "RV-12345");

        let bare = receipt_type(None, 1);
        assert_eq!(format_number(&bare, 7), "0007");
    }

    #[test]
    fn test_parse_sequence_roundtrip() {
        let vtype = receipt_type(Some("RV-"), 1);
        assert_eq!(parse_sequence(&vtype, &format_number(&vtype, 42)), Some(42));
        assert_eq!(parse_sequence(&vtype, "RV-0042"), Some(42));
        assert_eq!(parse_sequence(&vtype, "MANUAL-1"), None);
        assert_eq!(parse_sequence(&vtype, "RV-"), None);
    }
}
