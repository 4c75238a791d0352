//! The boot-candidate precedence rule (§4.5.3 step 5c), factored out as a
//! pure function so it can be tested without a database.

use diskctl_store::models::LogicalUnit;

/// Picks the next logical unit to boot from `candidates`, which must already
/// be filtered to `status = ONLINE` and ordered by id.
///
/// Never-attached units (`last_attached = NULL`) win outright, in id order.
/// Otherwise the unit with the earliest `last_attached` wins, ties broken by
/// id (the order `candidates` arrives in).
pub fn select_next_boot_candidate(candidates: &[LogicalUnit]) -> Option<&LogicalUnit> {
    if let Some(never_booted) = candidates.iter().find(|lu| lu.last_attached.is_none()) {
        return Some(never_booted);
    }
    candidates.iter().min_by_key(|lu| lu.last_attached)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use diskctl_store::models::LogicalUnitStatus;

    fn lu(id: i64, last_attached: Option<chrono::DateTime<Utc>>) -> LogicalUnit {
        LogicalUnit {
            id,
            name: format!("lu{id}"),
            vendor_id: String::new(),
            product_id: String::new(),
            product_rev: String::new(),
            vg_name: "vg0".to_string(),
            size_gib: 20.0,
            use_flag: true,
            status: LogicalUnitStatus::Online,
            boot_count: 0,
            last_attached,
            target_id: Some(1),
        }
    }

    #[test]
    fn no_candidates_yields_none() {
        assert!(select_next_boot_candidate(&[]).is_none());
    }

    #[test]
    fn a_never_attached_unit_wins_over_any_previously_attached_one() {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let candidates = vec![lu(1, Some(t)), lu(2, None)];
        assert_eq!(select_next_boot_candidate(&candidates).unwrap().id, 2);
    }

    #[test]
    fn among_never_attached_units_the_first_in_id_order_wins() {
        let candidates = vec![lu(1, None), lu(2, None)];
        assert_eq!(select_next_boot_candidate(&candidates).unwrap().id, 1);
    }

    #[test]
    fn the_earliest_last_attached_wins_when_all_have_booted_before() {
        let earlier = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let candidates = vec![lu(1, Some(later)), lu(2, Some(earlier))];
        assert_eq!(select_next_boot_candidate(&candidates).unwrap().id, 2);
    }
}
