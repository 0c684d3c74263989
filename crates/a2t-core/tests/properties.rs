//! Property tests for block scanning and literal rendering.

use a2t_core::{
    change_block_scope, dense_relation, grouping_sets, locate_block, BlockError, Grouping,
    Relation,
};
use proptest::prelude::*;

/// Balanced block body built from a token stream: 0 opens, 1 closes (only
/// when something is open), anything else emits a filler character.
fn balanced_inner(tokens: &[u8]) -> String {
    let mut inner = String::new();
    let mut depth = 0usize;
    for &token in tokens {
        match token {
            0 => {
                inner.push('{');
                depth += 1;
            }
            1 if depth > 0 => {
                inner.push('}');
                depth -= 1;
            }
            1 => inner.push(' '),
            2 => inner.push('\n'),
            _ => inner.push((b'a' + token % 26) as char),
        }
    }
    for _ in 0..depth {
        inner.push('}');
    }
    inner
}

fn labels(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("n{i}")).collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    #[test]
    fn located_block_is_balanced(
        tokens in prop::collection::vec(0u8..8, 0..64),
        trailing in "[a-z \n]{0,16}",
    ) {
        let inner = balanced_inner(&tokens);
        let prefix = "sig Node {}\ncheck Target ";
        let text = format!("{prefix}{{{inner}}}{trailing}");

        let location = locate_block(&text, "Target").unwrap().unwrap();
        let block = location.slice(&text);

        prop_assert_eq!(location.start, prefix.len());
        prop_assert_eq!(location.end, prefix.len() + inner.len() + 2);
        prop_assert_eq!(block.matches('{').count(), block.matches('}').count());

        let mut depth = 0i64;
        for c in block.chars() {
            match c {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
            prop_assert!(depth >= 0);
        }
    }

    #[test]
    fn unmatched_open_brace_leaves_text_unchanged(
        tokens in prop::collection::vec(0u8..8, 0..64),
        trailing in "[a-z \n]{0,16}",
    ) {
        let inner = balanced_inner(&tokens);
        let text = format!("check Target {{{{{inner}}}{trailing}");

        let is_unbalanced = matches!(
            locate_block(&text, "Target"),
            Err(BlockError::Unbalanced { .. })
        );
        prop_assert!(is_unbalanced);
        prop_assert_eq!(change_block_scope(&text, "Target", "for 3"), text);
    }

    #[test]
    fn injected_scope_follows_block(
        tokens in prop::collection::vec(0u8..8, 0..32),
        rest_of_line in "[a-z0-9 .]{0,12}",
        next_lines in "[a-z \n]{0,16}",
    ) {
        let inner = balanced_inner(&tokens);
        let head = format!("check Target {{{inner}}}");
        let text = format!("{head}{rest_of_line}\n{next_lines}");

        let result = change_block_scope(&text, "Target", "for 4");
        prop_assert_eq!(result, format!("{head} for 4\n{next_lines}"));
    }

    #[test]
    fn dense_relation_has_square_entry_count(
        n in 0usize..7,
        pairs in prop::collection::btree_set((0usize..7, 0usize..7), 0..20),
    ) {
        let relation: Relation = pairs.into_iter().filter(|&(i, j)| i < n && j < n).collect();
        let text = dense_relation(&labels(n), &relation);
        let entries = if text.is_empty() { 0 } else { text.lines().count() };

        prop_assert_eq!(entries, n * n);
        prop_assert_eq!(text.matches(":> TRUE").count(), relation.len());
        prop_assert_eq!(text.matches(" @@").count(), (n * n).saturating_sub(1));
    }

    #[test]
    fn grouping_rendering_ignores_insertion_order(
        entries in prop::collection::vec((0usize..5, prop::collection::vec(0usize..4, 0..5)), 0..6),
    ) {
        let forward: Grouping = entries.iter().cloned().collect();
        let backward: Grouping = forward.iter().rev().map(|(k, v)| (*k, v.clone())).collect();

        let labels = labels(4);
        prop_assert_eq!(
            grouping_sets(&labels, &forward).unwrap(),
            grouping_sets(&labels, &backward).unwrap()
        );
    }
}

#[test]
fn test_full_product_is_all_true() {
    let n = 4;
    let relation: Relation = (0..n).flat_map(|i| (0..n).map(move |j| (i, j))).collect();
    let text = dense_relation(&labels(n), &relation);
    assert_eq!(text.lines().count(), n * n);
    assert!(text.lines().all(|line| line.contains(":> TRUE")));
}

#[test]
fn test_empty_relation_is_all_false() {
    let n = 3;
    let text = dense_relation(&labels(n), &Relation::new());
    assert_eq!(text.lines().count(), n * n);
    assert!(text.lines().all(|line| line.contains(":> FALSE")));
}
