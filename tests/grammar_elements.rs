//! Grammar engine behavior over whole sentences.

use chemext::grammar::{caseless, group, hide, lit, one_or_more, opt, re, seq, skip_to};
use chemext::testing::sentence;
use proptest::prelude::*;

#[test]
fn composed_grammar_extracts_named_spans() {
    let s = sentence("the melting point of the sample was 89-91 °C exactly");
    let grammar = hide(caseless("melting point").unwrap())
        + skip_to(group("value", re(r"^\d").unwrap()))
        + opt(group("units", re(r"^°[A-Za-z]+$").unwrap()));
    let matches: Vec<_> = grammar.scan(s.tokens()).collect();
    assert_eq!(matches.len(), 1);
    let (_, _, result) = &matches[0];
    assert_eq!(result.first("value").unwrap().text(s.tokens()), "89-91");
    assert_eq!(result.first("units").unwrap().text(s.tokens()), "°C");
}

#[test]
fn seq_builder_matches_operator_composition() {
    let s = sentence("melting point 100");
    let built = seq(vec![
        lit("melting").unwrap(),
        lit("point").unwrap(),
        re(r"^\d+$").unwrap(),
    ])
    .unwrap();
    let operated = lit("melting").unwrap() + lit("point").unwrap() + re(r"^\d+$").unwrap();
    let a = built.match_at(s.tokens(), 0).map(|(end, _)| end);
    let b = operated.match_at(s.tokens(), 0).map(|(end, _)| end);
    assert_eq!(a, b);
    assert_eq!(a, Some(3));
}

#[test]
fn repeated_groups_collect_all_captures() {
    let s = sentence("cold cold cold done");
    let grammar = one_or_more(group("word", lit("cold").unwrap())) + hide(lit("done").unwrap());
    let (_, result) = grammar.match_at(s.tokens(), 0).unwrap();
    assert_eq!(result.all("word").len(), 3);
}

proptest! {
    /// A literal finds exactly the positions carrying its word.
    #[test]
    fn scan_finds_every_target_position(flags in prop::collection::vec(any::<bool>(), 1..20)) {
        let words: Vec<&str> = flags.iter().map(|&hit| if hit { "mp" } else { "pad" }).collect();
        let s = sentence(&words.join(" "));
        let target = lit("mp").unwrap();
        let found: Vec<usize> = target.scan(s.tokens()).map(|(start, _, _)| start).collect();
        let expected: Vec<usize> = flags
            .iter()
            .enumerate()
            .filter_map(|(index, &hit)| hit.then_some(index))
            .collect();
        prop_assert_eq!(found, expected);
    }

    /// Scanning is a pure function of its input.
    #[test]
    fn scan_is_deterministic(flags in prop::collection::vec(any::<bool>(), 1..20)) {
        let words: Vec<&str> = flags.iter().map(|&hit| if hit { "mp" } else { "pad" }).collect();
        let s = sentence(&words.join(" "));
        let grammar = lit("mp").unwrap() + opt(lit("pad").unwrap());
        let run = || -> Vec<(usize, usize)> {
            grammar.scan(s.tokens()).map(|(start, end, _)| (start, end)).collect()
        };
        prop_assert_eq!(run(), run());
    }

    /// Hiding a grammar changes captures, never consumption.
    #[test]
    fn hide_preserves_spans(flags in prop::collection::vec(any::<bool>(), 1..20)) {
        let words: Vec<&str> = flags.iter().map(|&hit| if hit { "mp" } else { "pad" }).collect();
        let s = sentence(&words.join(" "));
        let plain = lit("mp").unwrap();
        let hidden = hide(lit("mp").unwrap());
        let spans = |element: &chemext::grammar::ParseElement| -> Vec<(usize, usize)> {
            element.scan(s.tokens()).map(|(start, end, _)| (start, end)).collect()
        };
        prop_assert_eq!(spans(&plain), spans(&hidden));
    }

    /// Matches reported by a scan never overlap and advance monotonically.
    #[test]
    fn scan_matches_never_overlap(flags in prop::collection::vec(any::<bool>(), 2..24)) {
        let words: Vec<&str> = flags.iter().map(|&hit| if hit { "x" } else { "y" }).collect();
        let s = sentence(&words.join(" "));
        let pair = lit("x").unwrap() + lit("x").unwrap();
        let mut cursor = 0;
        for (start, end, _) in pair.scan(s.tokens()) {
            prop_assert!(start >= cursor);
            prop_assert!(end > start);
            cursor = end;
        }
    }
}
