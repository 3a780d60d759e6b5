//! Property tests for normalization.

use authz_normalization::TermNormalizer;
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalization_is_idempotent(text in "[A-Za-z0-9 \\-.,\t]{0,60}") {
        let normalizer = TermNormalizer::claims_review();
        let once = normalizer.normalize(&text);
        prop_assert_eq!(normalizer.normalize(&once), once);
    }

    #[test]
    fn case_does_not_matter(text in "[A-Za-z0-9 \\-]{0,60}") {
        let normalizer = TermNormalizer::claims_review();
        prop_assert_eq!(
            normalizer.normalize(&text.to_uppercase()),
            normalizer.normalize(&text.to_lowercase())
        );
    }

    #[test]
    fn output_has_no_edge_or_double_spaces(text in "[a-z \t\n]{0,40}") {
        let normalizer = TermNormalizer::case_only();
        let out = normalizer.normalize(&text);
        prop_assert!(!out.starts_with(' '));
        prop_assert!(!out.ends_with(' '));
        prop_assert!(!out.contains("  "));
    }

    #[test]
    fn folded_view_ignores_the_stem_table(
        words in prop::collection::vec("(approved|Denial|upheld|REQ-7|claim|x)", 0..8)
    ) {
        let text = words.join(" ");
        let analyzed = TermNormalizer::claims_review().analyze(&text);
        prop_assert_eq!(analyzed.folded(), TermNormalizer::case_only().normalize(&text));
        prop_assert_eq!(
            analyzed.folded_range(0, analyzed.stemmed().len()),
            (0, analyzed.folded().len())
        );
    }
}

#[test]
fn overturned_variants_match_the_rule_pattern() {
    let normalizer = TermNormalizer::claims_review();
    let pattern = normalizer.normalize("Overturned");
    assert!(normalizer.normalize("OVERTURNED").contains(&pattern));
    assert!(normalizer.normalize("overturned").contains(&pattern));
    assert!(normalizer.normalize("claim overturning").contains(&pattern));
}
