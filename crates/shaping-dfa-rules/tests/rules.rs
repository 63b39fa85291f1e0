//! End-to-end tests compiling rule text and matching symbol sequences.
#![expect(
    clippy::expect_used,
    reason = "tests require descriptive panic messages"
)]

use rstest::rstest;
use shaping_dfa::{Automaton, CompileError, Compiler, Symbol};
use shaping_dfa_rules::{RuleError, compile_rules, compile_rules_with, parse_rules};

fn compile_with_alphabet(text: &str, alphabet_size: usize) -> Automaton {
    compile_rules_with(text, &Compiler::new().with_min_alphabet_size(alphabet_size))
        .expect("rules should compile")
}

fn runs(automaton: &Automaton, input: &[Symbol]) -> Vec<(usize, usize, Vec<String>)> {
    automaton
        .match_all(input)
        .expect("input should be in range")
        .into_iter()
        .map(|m| (m.start, m.end, m.tags.iter().cloned().collect()))
        .collect()
}

#[rstest]
#[case::plus("Main = 1+;", &[1, 1, 1], vec![(0, 2)])]
#[case::broken_run("Main = a:(1) 2;", &[1, 2, 9, 1, 2], vec![(0, 1), (3, 4)])]
#[case::alternation_loop("Main = (1|2)+;", &[1, 2, 1, 2, 1], vec![(0, 4)])]
#[case::restart_on_fail("Main = 1 2;", &[1, 1, 2], vec![(1, 2)])]
#[case::bounded("Main = 1{1,2};", &[1, 1, 1], vec![(0, 1), (2, 2)])]
fn matches_rule_text(
    #[case] text: &str,
    #[case] input: &[Symbol],
    #[case] expected: Vec<(usize, usize)>,
) {
    let automaton = compile_with_alphabet(text, 10);
    let spans: Vec<_> = runs(&automaton, input)
        .into_iter()
        .map(|(start, end, _)| (start, end))
        .collect();
    assert_eq!(spans, expected);
}

#[test]
fn nested_tags_are_reported_together() {
    let automaton = compile_with_alphabet("Main = x:(1 y:(2));", 3);
    assert_eq!(
        runs(&automaton, &[1, 2]),
        vec![(0, 1, vec!["x".to_string(), "y".to_string()])]
    );
}

#[test]
fn named_symbols_and_external_categories_combine() {
    let text = "
        # base consonant with up to two subscript pairs
        Coeng = 3;
        Cluster = C (Coeng C){0,2};
        Main = cluster:(Cluster) V?;
    ";
    let automaton = compile_rules(text, [("C", 0), ("V", 1), ("X", 2)])
        .expect("rules should compile");
    assert_eq!(automaton.alphabet_size(), 4);
    assert_eq!(automaton.symbol("Coeng"), Some(3));
    // The first run ends in the state after `V`, which is past the tag.
    assert_eq!(
        runs(&automaton, &[0, 3, 0, 1, 2, 0]),
        vec![(0, 3, vec![]), (5, 5, vec!["cluster".to_string()])]
    );
}

#[test]
fn recompiling_text_is_deterministic() {
    let text = "C = 0; V = 1; Main = s:(C V?)+;";
    let none: [(&str, Symbol); 0] = [];
    let first = compile_rules(text, none).expect("rules should compile");
    let second = compile_rules(text, none).expect("rules should compile");
    assert_eq!(first, second);
}

#[test]
fn forwards_undefined_references() {
    let err = compile_rules("Main = C;", [("V", 0)]).expect_err("C is undefined");
    assert_eq!(
        err,
        RuleError::Compile(CompileError::UndefinedReference { name: "C".into() })
    );
}

#[test]
fn forwards_missing_entry_rule() {
    let none: [(&str, Symbol); 0] = [];
    let err = compile_rules("C = 0;", none).expect_err("Main is missing");
    assert_eq!(err, RuleError::Compile(CompileError::MissingEntryRule));
}

#[test]
fn exposes_syntax_error_details() {
    let Err(RuleError::Syntax(info)) = parse_rules("Main = (1 2;") else {
        panic!("expected a syntax error");
    };
    assert_eq!(info.message, "expected `)` to close group");
    assert_eq!(info.position, 11);
    assert_eq!(info.found.as_deref(), Some(";"));
}
