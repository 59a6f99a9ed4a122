//! Live text filtering over rendered entries

/// Anything with a full rendered text to match against
pub trait Searchable {
    /// Every piece of text the entry displays, in display order
    fn search_text(&self) -> String;
}

/// Entries whose rendered text contains `query`, case-insensitively.
///
/// An empty query keeps everything. The input is only borrowed, so the
/// result set behind the view is never touched.
pub fn filter_entries<'a, T: Searchable>(entries: &'a [T], query: &str) -> Vec<&'a T> {
    let needle = query.to_lowercase();
    entries
        .iter()
        .filter(|entry| needle.is_empty() || entry.search_text().to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry(String);

    impl Searchable for Entry {
        fn search_text(&self) -> String {
            self.0.clone()
        }
    }

    #[test]
    fn test_case_insensitive_substring() {
        let entries = vec![
            Entry("Merchant: Coffee Hut".into()),
            Entry("Merchant: ELECTRO WORLD".into()),
        ];

        let hits = filter_entries(&entries, "electro");
        assert_eq!(hits, vec![&entries[1]]);
        assert_eq!(filter_entries(&entries, "").len(), 2);
        assert!(filter_entries(&entries, "pharmacy").is_empty());
    }

    proptest! {
        #[test]
        fn filtering_is_idempotent_and_non_mutating(
            texts in proptest::collection::vec("[a-zA-Z ]{0,12}", 0..8),
            query in "[a-zA-Z]{0,3}"
        ) {
            let entries: Vec<Entry> = texts.into_iter().map(Entry).collect();
            let before = entries.clone();

            let once: Vec<Entry> = filter_entries(&entries, &query).into_iter().cloned().collect();
            let twice: Vec<&Entry> = filter_entries(&once, &query);

            prop_assert_eq!(twice.into_iter().cloned().collect::<Vec<_>>(), once.clone());
            prop_assert_eq!(filter_entries(&entries, &query).len(), once.len());
            prop_assert_eq!(entries, before);
        }
    }
}
