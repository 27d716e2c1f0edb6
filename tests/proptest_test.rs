use gitver::analyzer::CommitClassifier;
use gitver::domain::{CommitPriority, SemanticVersion, VersionBump};
use gitver::ledger::VersionLedger;
use proptest::prelude::*;

/// Messages that carry none of the default markers
fn plain_message() -> impl Strategy<Value = String> {
    "[a-z ]{0,30}".prop_map(|s| format!("chore: {}", s))
}

fn any_message() -> impl Strategy<Value = String> {
    prop_oneof![
        plain_message(),
        "[a-z ]{0,20}".prop_map(|s| format!("fix: {}", s)),
        "[a-z ]{0,20}".prop_map(|s| format!("feat: {}", s)),
    ]
}

fn any_bump() -> impl Strategy<Value = VersionBump> {
    prop_oneof![
        Just(VersionBump::Major),
        Just(VersionBump::Minor),
        Just(VersionBump::Patch),
    ]
}

proptest! {
    #[test]
    fn breaking_change_anywhere_wins(
        mut messages in prop::collection::vec(any_message(), 0..20),
        position in any::<prop::sample::Index>(),
    ) {
        let index = position.index(messages.len() + 1);
        messages.insert(index, "refactor: x\n\nBREAKING CHANGE: y".to_string());

        let classifier = CommitClassifier::default();
        prop_assert_eq!(classifier.classify(&messages), CommitPriority::BreakingChange);
    }

    #[test]
    fn unmarked_messages_classify_as_none(messages in prop::collection::vec(plain_message(), 0..20)) {
        prop_assert_eq!(CommitClassifier::default().classify(&messages), CommitPriority::None);
    }

    #[test]
    fn classification_ignores_order(mut messages in prop::collection::vec(any_message(), 0..20)) {
        let classifier = CommitClassifier::default();
        let forward = classifier.classify(&messages);
        messages.reverse();
        prop_assert_eq!(classifier.classify(&messages), forward);
    }

    #[test]
    fn bumps_grow_history_strictly(bumps in prop::collection::vec(any_bump(), 0..30)) {
        let mut ledger = VersionLedger::new();
        for bump in &bumps {
            ledger.bump(*bump).unwrap();
        }

        prop_assert_eq!(ledger.len(), bumps.len() + 1);
        for pair in ledger.entries().windows(2) {
            prop_assert!(pair[0].version() < pair[1].version());
        }
    }

    #[test]
    fn bump_resets_lower_components(
        major in 0u32..1000,
        minor in 0u32..1000,
        patch in 0u32..1000,
    ) {
        let version = SemanticVersion::new(major, minor, patch);

        prop_assert_eq!(
            version.bump(VersionBump::Major).unwrap(),
            SemanticVersion::new(major + 1, 0, 0)
        );
        prop_assert_eq!(
            version.bump(VersionBump::Minor).unwrap(),
            SemanticVersion::new(major, minor + 1, 0)
        );
        prop_assert_eq!(
            version.bump(VersionBump::Patch).unwrap(),
            SemanticVersion::new(major, minor, patch + 1)
        );
    }

    #[test]
    fn display_parse_round_trip(major in any::<u32>(), minor in any::<u32>(), patch in any::<u32>()) {
        let version = SemanticVersion::new(major, minor, patch);
        prop_assert_eq!(SemanticVersion::parse(&version.to_string()).unwrap(), version);
    }
}
