//! Property-based tests for the adapter types.
//!
//! These tests use proptest to verify round-trip invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;

use grapple::{Oid, StrArray};

proptest! {
    /// A string array built from M host strings converts back to the
    /// same M strings in the same order.
    #[test]
    fn strarray_round_trip(items in prop::collection::vec("[^\\x00]{0,24}", 0..8)) {
        let array = StrArray::from_strings(items.clone()).unwrap();
        prop_assert_eq!(array.len(), items.len());
        prop_assert_eq!(array.to_vec(), items);
    }

    /// Deep clones stay equal to, and independent of, the original.
    #[test]
    fn strarray_clone_is_deep(items in prop::collection::vec("[a-z/.]{0,16}", 0..6)) {
        let original = StrArray::from_strings(items.clone()).unwrap();
        let copy = original.clone();
        drop(original);
        prop_assert_eq!(copy.to_vec(), items);
    }

    /// Any 20 raw bytes survive the hex display/parse round trip.
    #[test]
    fn oid_hex_round_trip(bytes in prop::collection::vec(any::<u8>(), 20)) {
        let id = Oid::from_bytes(&bytes).unwrap();
        let hex = id.to_string();
        prop_assert_eq!(hex.len(), 40);
        let parsed = Oid::from_hex(&hex).unwrap();
        prop_assert_eq!(parsed, id);
        prop_assert_eq!(parsed.as_bytes(), &bytes[..]);
    }

    /// Ordering over ids matches ordering over their raw bytes.
    #[test]
    fn oid_ordering_matches_bytes(a in prop::collection::vec(any::<u8>(), 20),
                                  b in prop::collection::vec(any::<u8>(), 20)) {
        let oid_a = Oid::from_bytes(&a).unwrap();
        let oid_b = Oid::from_bytes(&b).unwrap();
        prop_assert_eq!(oid_a.cmp(&oid_b), a.cmp(&b));
    }
}
