//! Tests for the reply-chain consistency filter.

#[cfg(test)]
mod tests {
    use crate::testing::post;
    use crate::{filter_consistent, filter_consistent_with_report, FilterReport, WorkingSet};

    fn ids(set: &WorkingSet) -> Vec<&str> {
        set.iter().map(|p| p.id.as_str()).collect()
    }

    fn mixed_set() -> WorkingSet {
        [
            post("1", None),
            post("2", Some("1")),
            post("3", Some("missing")),
            post("4", Some("3")),
            post("5", None),
            post("6", Some("2")),
            post("7", Some("8")),
            post("8", Some("7")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn keeps_root_and_reply_drops_orphan() {
        let set: WorkingSet =
            [post("10", None), post("11", Some("10")), post("12", Some("missing-id"))]
                .into_iter()
                .collect();
        let filtered = filter_consistent(&set);
        assert_eq!(ids(&filtered), vec!["10", "11"]);
    }

    #[test]
    fn filter_is_idempotent() {
        let once = filter_consistent(&mixed_set());
        let twice = filter_consistent(&once);
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn roots_always_retained() {
        let set: WorkingSet = (1..=5).map(|i| post(&i.to_string(), None)).collect();
        let filtered = filter_consistent(&set);
        assert_eq!(filtered.len(), 5);
    }

    #[test]
    fn reply_to_reply_retained_when_chain_reaches_root() {
        let set: WorkingSet = [post("3", Some("2")), post("2", Some("1")), post("1", None)]
            .into_iter()
            .collect();
        let filtered = filter_consistent(&set);
        assert_eq!(ids(&filtered), vec!["3", "2", "1"]);
    }

    #[test]
    fn descendants_of_orphans_are_dropped() {
        let filtered = filter_consistent(&mixed_set());
        assert!(!filtered.contains("3"));
        assert!(!filtered.contains("4"), "parent 3 is dropped, so 4 would dangle");
    }

    #[test]
    fn parent_loop_without_root_is_dropped() {
        let filtered = filter_consistent(&mixed_set());
        assert!(!filtered.contains("7"));
        assert!(!filtered.contains("8"));
    }

    #[test]
    fn self_parent_is_dropped() {
        let set: WorkingSet = [post("1", Some("1"))].into_iter().collect();
        assert!(filter_consistent(&set).is_empty());
    }

    #[test]
    fn every_retained_reply_has_retained_parent() {
        let filtered = filter_consistent(&mixed_set());
        for p in &filtered {
            if let Some(parent) = p.parent_id.as_deref() {
                assert!(filtered.contains(parent), "{} points at missing {parent}", p.id);
            }
        }
    }

    #[test]
    fn preserves_input_order() {
        let filtered = filter_consistent(&mixed_set());
        assert_eq!(ids(&filtered), vec!["1", "2", "5", "6"]);
    }

    #[test]
    fn reports_counts() {
        let (_, report) = filter_consistent_with_report(&mixed_set());
        assert_eq!(report, FilterReport { retained: 4, dropped: 4 });
    }

    #[test]
    fn empty_set_stays_empty() {
        let (filtered, report) = filter_consistent_with_report(&WorkingSet::new());
        assert!(filtered.is_empty());
        assert_eq!(report, FilterReport::default());
    }

    #[test]
    fn boosts_are_not_required_to_resolve() {
        let mut boost = post("20", None);
        boost.reblog_of_id = Some("999".to_owned());
        let set: WorkingSet = [boost].into_iter().collect();
        assert_eq!(filter_consistent(&set).len(), 1);
    }

    #[test]
    fn duplicate_ids_keep_first_insertion() {
        let mut set = WorkingSet::new();
        assert!(set.insert(post("1", None)));
        assert!(!set.insert(post("1", Some("0"))));
        assert_eq!(set.len(), 1);
        assert!(set.get("1").is_some_and(|p| p.parent_id.is_none()));
    }
}
