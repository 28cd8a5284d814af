use oie_core::{PatternCount, SimplifyConfig, TieBreak};
use oie_patterns::{
    compare, split_top_level, Atom, FixpointCompressor, GreedyCompressor, PatternCompressor,
    PatternNode, Simplifier,
};
use proptest::prelude::*;

fn arb_atom() -> impl Strategy<Value = String> {
    (
        "[*a-z]{1,4}",
        "[CPMBTJRS]",
        "[a-z]{0,1}",
        proptest::option::of("(?:[a-z]|\\[[a-z]{2}\\]){1,3}"),
    )
        .prop_map(|(text, tag, subtype, roles)| match roles {
            Some(roles) => format!("{text}/{tag}{subtype}.{roles}"),
            None => format!("{text}/{tag}{subtype}"),
        })
}

fn arb_pattern() -> impl Strategy<Value = PatternNode> {
    let leaf = arb_atom().prop_map(PatternNode::atom);
    let tree = leaf.prop_recursive(3, 24, 4, |inner| {
        prop::collection::vec(inner, 1..4).prop_map(PatternNode::edge)
    });
    prop::collection::vec(tree, 1..4).prop_map(PatternNode::edge)
}

/// Patterns over a tiny alphabet, so that many pairs are mergeable
fn arb_close_pattern() -> impl Strategy<Value = String> {
    let atom = prop_oneof![
        "[xy]{1,2}".prop_map(|tail| format!("P1/C{tail}")),
        "[xy]{1,2}".prop_map(|tail| format!("Q1/D{tail}")),
    ];
    prop::collection::vec(atom, 1..3).prop_map(|atoms| format!("({})", atoms.join(" ")))
}

fn arb_counts() -> impl Strategy<Value = Vec<PatternCount>> {
    prop::collection::vec((arb_close_pattern(), 1u64..100), 0..12).prop_map(|items| {
        items
            .into_iter()
            .map(|(pattern, count)| PatternCount::new(pattern, count))
            .collect()
    })
}

fn total(patterns: &[PatternCount]) -> u64 {
    patterns.iter().map(|pc| pc.count).sum()
}

proptest! {
    #[test]
    fn rendering_round_trips(node in arb_pattern()) {
        let rendered = node.to_string();
        let reparsed = PatternNode::parse(&rendered).unwrap();
        prop_assert_eq!(reparsed.to_string(), rendered);
        prop_assert_eq!(reparsed, node);
    }

    #[test]
    fn split_matches_children(node in arb_pattern()) {
        let tokens: Vec<String> = node.children().iter().map(|c| c.to_string()).collect();
        prop_assert_eq!(split_top_level(&node.to_string()), tokens);
    }

    #[test]
    fn simplify_is_idempotent(
        node in arb_pattern(),
        loose in any::<bool>(),
        brace in any::<bool>(),
    ) {
        let config = if loose { SimplifyConfig::loose() } else { SimplifyConfig::strict() };
        let simplifier = Simplifier::new(config.with_brace_roles(brace));
        let once = simplifier.simplify(&node);
        prop_assert_eq!(simplifier.simplify(&once), once);
    }

    #[test]
    fn strict_is_never_longer_than_loose(label in arb_atom()) {
        let atom = Atom::new(label);
        let strict = Simplifier::new(SimplifyConfig::strict()).simplify_atom(&atom);
        let loose = Simplifier::new(SimplifyConfig::loose()).simplify_atom(&atom);
        prop_assert!(strict.len() <= loose.len(), "{} vs {}", strict, loose);
    }

    #[test]
    fn braced_patterns_stay_comparable(a in arb_pattern(), b in arb_pattern()) {
        let simplifier = Simplifier::new(SimplifyConfig::strict().with_brace_roles(true));
        let a = simplifier.simplify(&a);
        let b = simplifier.simplify(&b);
        prop_assert!(compare(&a, &b).is_ok(), "{} vs {}", a, b);
    }

    #[test]
    fn compare_is_symmetric(a in arb_close_pattern(), b in arb_close_pattern()) {
        let a = PatternNode::parse(&a).unwrap();
        let b = PatternNode::parse(&b).unwrap();
        // No-merge reasons name a left and right side, so compare results only
        let ab = compare(&a, &b).unwrap().merged();
        let ba = compare(&b, &a).unwrap().merged();
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn compression_conserves_counts(patterns in arb_counts()) {
        let expected = total(&patterns);
        let greedy = GreedyCompressor.compress(&patterns).unwrap();
        prop_assert_eq!(greedy.total(), expected);
        let fixpoint = FixpointCompressor.compress(&patterns).unwrap();
        prop_assert_eq!(fixpoint.total(), expected);
    }

    #[test]
    fn fixpoint_ignores_input_order(
        (patterns, shuffled) in arb_counts()
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let a = FixpointCompressor.compress(&patterns).unwrap().sorted(TieBreak::Lexicographic);
        let b = FixpointCompressor.compress(&shuffled).unwrap().sorted(TieBreak::Lexicographic);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn fixpoint_never_leaves_mergeable_pairs(patterns in arb_counts()) {
        let result = FixpointCompressor.compress(&patterns).unwrap();
        let nodes: Vec<PatternNode> = result
            .iter()
            .map(|(pattern, _)| PatternNode::parse(pattern).unwrap())
            .collect();
        for (i, a) in nodes.iter().enumerate() {
            for b in nodes.iter().skip(i + 1) {
                prop_assert!(!compare(a, b).unwrap().is_merged());
            }
        }
    }
}
