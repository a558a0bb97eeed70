#![allow(clippy::unwrap_used)]

use bqsyntax::parser::{LexerState, SyntaxKind, tokenize, tokenize_all};
use bqsyntax::{LineCol, TextSize};
use rstest::rstest;

/// Kinds of the significant tokens of `input`
fn kinds(input: &str) -> Vec<SyntaxKind> {
    tokenize_all(input)
        .into_iter()
        .map(|token| token.kind)
        .filter(|kind| !kind.is_trivia())
        .collect()
}

#[rstest]
#[case("select", SyntaxKind::SELECT_KW)]
#[case("SeLeCt", SyntaxKind::SELECT_KW)]
#[case("my_table", SyntaxKind::IDENT)]
#[case("`project.dataset.table`", SyntaxKind::QUOTED_IDENT)]
#[case("42", SyntaxKind::NUMBER)]
#[case("1.5e-3", SyntaxKind::NUMBER)]
#[case(".5", SyntaxKind::NUMBER)]
#[case("0x1F", SyntaxKind::NUMBER)]
#[case("'text'", SyntaxKind::STRING)]
#[case("\"text\"", SyntaxKind::STRING)]
#[case("r'\\d+'", SyntaxKind::STRING)]
#[case("'''multi\nline'''", SyntaxKind::STRING)]
#[case("b'bytes'", SyntaxKind::BYTES)]
#[case("@param", SyntaxKind::PARAMETER)]
#[case("@@dataset_id", SyntaxKind::SYSTEM_VARIABLE)]
#[case("?", SyntaxKind::QUESTION)]
#[case("<>", SyntaxKind::NEQ)]
#[case("||", SyntaxKind::PIPE_PIPE)]
#[case("<<", SyntaxKind::SHL)]
#[case(">>", SyntaxKind::SHR)]
fn test_single_token_kinds(#[case] input: &str, #[case] expected: SyntaxKind) {
    assert_eq!(kinds(input), vec![expected], "input: {input}");
}

#[rstest]
#[case("'unterminated")]
#[case("/* never closed")]
#[case("`open")]
#[case("$")]
fn test_bad_input_becomes_error_token(#[case] input: &str) {
    let tokens = tokenize_all(input);
    assert!(tokens.iter().any(|token| token.kind == SyntaxKind::ERROR_TOKEN));
    let text: String = tokens.iter().map(|token| token.text).collect();
    assert_eq!(text, input);
}

#[test]
fn test_comments_are_trivia() {
    let tokens = tokenize_all("SELECT -- one\n# two\n/* three */ 1");
    let trivia: Vec<_> = tokens
        .iter()
        .filter(|token| token.kind.is_trivia() && token.kind != SyntaxKind::WHITESPACE)
        .map(|token| token.kind)
        .collect();
    assert_eq!(
        trivia,
        vec![
            SyntaxKind::LINE_COMMENT,
            SyntaxKind::LINE_COMMENT,
            SyntaxKind::BLOCK_COMMENT
        ]
    );
}

#[test]
fn test_tokenize_resumes_from_state() {
    let text = "SELECT a\nFROM t";
    let mut state = LexerState::default();
    let mut seen = Vec::new();
    while let Some((token, next)) = tokenize(text, state) {
        seen.push((token.kind, token.start));
        state = next;
    }
    assert_eq!(seen.len(), tokenize_all(text).len());
    assert!(seen.contains(&(SyntaxKind::FROM_KW, LineCol::new(1, 0))));

    // Restarting at `FROM` yields the same tail.
    let resumed = tokenize(text, LexerState::new(TextSize::new(9), LineCol::new(1, 0))).unwrap();
    assert_eq!(resumed.0.kind, SyntaxKind::FROM_KW);
    assert_eq!(resumed.0.offset, TextSize::new(9));
}

#[test]
fn test_literal_values() {
    let tokens = tokenize_all("'it\\'s' `my table` r\"raw\"");
    let values: Vec<_> = tokens
        .iter()
        .filter_map(|token| token.value())
        .map(|value| value.to_string())
        .collect();
    assert_eq!(values.len(), 3);
    assert_eq!(values[0], "it's");
    assert_eq!(values[1], "my table");
    assert_eq!(values[2], "raw");
}
