//! Property tests for the option merge rules.

use std::collections::BTreeSet;

use proptest::prelude::*;
use serde_json::json;

use criteria_merge::ModelDescriptor;
use criteria_types::{ClassId, Fragment, SearchOptions};
use e2e_tests::TestHarness;

const CLASSES: &[&str] = &["Article", "Author", "Comment", "Tag", "User"];

fn class_subset() -> impl Strategy<Value = Vec<&'static str>> {
    proptest::sample::subsequence(CLASSES, 0..=CLASSES.len())
}

proptest! {
    /// Classes from the default scope and the caller are unioned with the calling class.
    #[test]
    fn classes_are_unioned(
        scoped in prop::collection::vec(class_subset(), 0..4),
        caller in class_subset(),
    ) {
        let harness = TestHarness::new();
        let fragments: Vec<Fragment> = scoped
            .iter()
            .map(|names| {
                Fragment::options(SearchOptions::new().with_classes(names.iter().copied()))
            })
            .collect();
        let descriptor = ModelDescriptor::new("Article")
            .with_default_scope_fn(move || fragments.clone());

        let search = harness
            .model(descriptor)
            .search(None, SearchOptions::new().with_classes(caller.iter().copied()))
            .unwrap();

        let mut expected: BTreeSet<ClassId> = scoped
            .iter()
            .flatten()
            .chain(caller.iter())
            .map(|name| ClassId::new(*name))
            .collect();
        expected.insert(ClassId::new("Article"));

        prop_assert_eq!(search.request().classes(), &expected);
    }

    /// The later fragment's value wins for a scalar option.
    #[test]
    fn scalar_options_last_wins(
        key in "[a-z]{1,10}",
        first in "[a-z ]{1,12}",
        second in "[a-z ]{1,12}",
    ) {
        prop_assume!(first != second);

        let harness = TestHarness::new();
        let scope_key = key.clone();
        let scope_value = first.clone();
        let descriptor = ModelDescriptor::new("Article").with_default_scope_fn(move || {
            vec![Fragment::options(
                SearchOptions::new().with_option(scope_key.clone(), scope_value.clone()),
            )]
        });

        let search = harness
            .model(descriptor)
            .search(None, SearchOptions::new().with_option(key.clone(), second.clone()))
            .unwrap();

        prop_assert_eq!(search.request().options().option(&key), Some(&json!(second)));
    }

    /// Flags follow last-wins too, and an absent flag leaves the earlier value.
    #[test]
    fn flags_last_wins(first in any::<bool>(), second in proptest::option::of(any::<bool>())) {
        let mut options = SearchOptions::new().with_populate(first);
        let mut incoming = SearchOptions::new();
        incoming.populate = second;
        options.merge(&incoming);

        prop_assert_eq!(options.populate, Some(second.unwrap_or(first)));
    }
}
