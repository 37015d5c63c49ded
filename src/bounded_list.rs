/// Bounded list operations shared by favorites, history, quick links and
/// todos: front insertion, per-list dedupe policy, tail truncation.
///
/// Lists are newest-first. Truncation drops from the tail, so the newest
/// entry always survives an append at capacity.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupePolicy {
    /// No duplicate detection.
    None,
    /// An existing match is promoted to the front (history behavior).
    MoveToFront,
    /// An existing match rejects the append outright (favorites behavior).
    Reject,
}

#[derive(Debug, Clone, Copy)]
pub struct ListPolicy {
    pub max_len: Option<usize>,
    pub dedupe: DedupePolicy,
}

/// Favorites: capped, duplicates rejected with a signal the UI can toast.
pub const FAVORITES: ListPolicy = ListPolicy {
    max_len: Some(12),
    dedupe: DedupePolicy::Reject,
};

/// History: capped, re-applying a known entry promotes it to the front.
pub const HISTORY: ListPolicy = ListPolicy {
    max_len: Some(10),
    dedupe: DedupePolicy::MoveToFront,
};

/// Quick links and todos: unconstrained, explicit removal only.
pub const UNBOUNDED: ListPolicy = ListPolicy {
    max_len: None,
    dedupe: DedupePolicy::None,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum AppendOutcome {
    Added,
    Promoted,
    Rejected,
}

/// Insert at the front per the policy. `same` is the key-equality
/// predicate used for duplicate detection.
pub fn append<T>(
    list: &mut Vec<T>,
    item: T,
    policy: &ListPolicy,
    same: impl Fn(&T, &T) -> bool,
) -> AppendOutcome {
    if !matches!(policy.dedupe, DedupePolicy::None) {
        if let Some(index) = list.iter().position(|entry| same(entry, &item)) {
            match policy.dedupe {
                DedupePolicy::Reject => return AppendOutcome::Rejected,
                _ => {
                    // Length is unchanged, so no truncation is needed.
                    list.remove(index);
                    list.insert(0, item);
                    return AppendOutcome::Promoted;
                }
            }
        }
    }
    list.insert(0, item);
    if let Some(max) = policy.max_len {
        list.truncate(max);
    }
    AppendOutcome::Added
}

/// Positional removal. Callers re-fetch the list immediately before
/// removing; indices are not stable across concurrent writers.
pub fn remove_at<T>(list: &mut Vec<T>, index: usize) -> Option<T> {
    (index < list.len()).then(|| list.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Swatch;

    fn colors(values: &[&str]) -> Vec<Swatch> {
        values.iter().map(|v| Swatch::color(v)).collect()
    }

    fn same(a: &Swatch, b: &Swatch) -> bool {
        a == b
    }

    #[test]
    fn test_append_inserts_at_front() {
        let mut list = colors(&["#111111", "#222222"]);

        let outcome = append(&mut list, Swatch::color("#333333"), &HISTORY, same);

        assert_eq!(outcome, AppendOutcome::Added);
        assert_eq!(list[0].value, "#333333");
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_full_list_drops_oldest_and_keeps_newest() {
        let eight_max = ListPolicy {
            max_len: Some(8),
            dedupe: DedupePolicy::Reject,
        };
        let mut list = colors(&[
            "#000001", "#000002", "#000003", "#000004", "#000005", "#000006", "#000007", "#000008",
        ]);

        let outcome = append(&mut list, Swatch::color("#000009"), &eight_max, same);

        assert_eq!(outcome, AppendOutcome::Added);
        assert_eq!(list.len(), 8);
        assert_eq!(list[0].value, "#000009");
        assert!(!list.iter().any(|s| s.value == "#000008"));
    }

    #[test]
    fn test_favorites_policy_caps_at_twelve() {
        let mut list = Vec::new();
        for i in 0..13 {
            let _ = append(&mut list, Swatch::color(&format!("#0000{i:02}")), &FAVORITES, same);
        }

        assert_eq!(list.len(), 12);
        assert_eq!(list[0].value, "#000012");
    }

    #[test]
    fn test_history_duplicate_promotes_without_growth() {
        let mut list = colors(&["#AAAAAA", "#BBBBBB", "#CCCCCC", "#DDDDDD", "#EEEEEE"]);
        assert_eq!(list[3].value, "#DDDDDD");

        let outcome = append(&mut list, Swatch::color("#DDDDDD"), &HISTORY, same);

        assert_eq!(outcome, AppendOutcome::Promoted);
        assert_eq!(list.len(), 5);
        assert_eq!(list[0].value, "#DDDDDD");
        assert_eq!(list.iter().filter(|s| s.value == "#DDDDDD").count(), 1);
    }

    #[test]
    fn test_favorites_duplicate_rejected_and_list_unchanged() {
        let mut list = colors(&["#AAAAAA", "#BBBBBB"]);
        let before = list.clone();

        let outcome = append(&mut list, Swatch::color("#BBBBBB"), &FAVORITES, same);

        assert_eq!(outcome, AppendOutcome::Rejected);
        assert_eq!(list, before);
    }

    #[test]
    fn test_dedupe_matches_on_kind_and_value() {
        let mut list = vec![Swatch::gradient("#AAAAAA")];

        // Same value, different kind: not a duplicate.
        let outcome = append(&mut list, Swatch::color("#AAAAAA"), &FAVORITES, same);

        assert_eq!(outcome, AppendOutcome::Added);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_history_cap_applies_after_fresh_insert() {
        let mut list = Vec::new();
        for i in 0..11 {
            let _ = append(&mut list, Swatch::color(&format!("#1111{i:02}")), &HISTORY, same);
        }

        assert_eq!(list.len(), 10);
        assert_eq!(list[0].value, "#111110");
    }

    #[test]
    fn test_unbounded_append_never_truncates_or_dedupes() {
        let mut list = Vec::new();
        for _ in 0..20 {
            let _ = append(&mut list, Swatch::color("#222222"), &UNBOUNDED, same);
        }

        assert_eq!(list.len(), 20);
    }

    #[test]
    fn test_remove_at() {
        let mut list = colors(&["#111111", "#222222", "#333333"]);

        let removed = remove_at(&mut list, 1);

        assert_eq!(removed.map(|s| s.value), Some("#222222".to_string()));
        assert_eq!(list.len(), 2);
        assert_eq!(remove_at(&mut list, 5), None);
    }
}
