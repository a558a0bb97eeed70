//! Keyword table for the BigQuery dialect
//!
//! Keywords are matched case-insensitively. Reserved keywords can never be
//! identifiers; non-reserved ones are lexed as keywords and demoted to
//! identifiers by the parser where the keyword reading has no meaning.

use super::SyntaxKind;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

/// Keywords that can never be used as unquoted identifiers
pub const RESERVED: &[(&str, SyntaxKind)] = &[
    ("ALL", SyntaxKind::ALL_KW),
    ("AND", SyntaxKind::AND_KW),
    ("ARRAY", SyntaxKind::ARRAY_KW),
    ("AS", SyntaxKind::AS_KW),
    ("ASC", SyntaxKind::ASC_KW),
    ("BETWEEN", SyntaxKind::BETWEEN_KW),
    ("BY", SyntaxKind::BY_KW),
    ("CASE", SyntaxKind::CASE_KW),
    ("CAST", SyntaxKind::CAST_KW),
    ("CROSS", SyntaxKind::CROSS_KW),
    ("CURRENT", SyntaxKind::CURRENT_KW),
    ("DESC", SyntaxKind::DESC_KW),
    ("DISTINCT", SyntaxKind::DISTINCT_KW),
    ("ELSE", SyntaxKind::ELSE_KW),
    ("END", SyntaxKind::END_KW),
    ("EXCEPT", SyntaxKind::EXCEPT_KW),
    ("EXISTS", SyntaxKind::EXISTS_KW),
    ("EXTRACT", SyntaxKind::EXTRACT_KW),
    ("FALSE", SyntaxKind::FALSE_KW),
    ("FOLLOWING", SyntaxKind::FOLLOWING_KW),
    ("FROM", SyntaxKind::FROM_KW),
    ("FULL", SyntaxKind::FULL_KW),
    ("GROUP", SyntaxKind::GROUP_KW),
    ("HAVING", SyntaxKind::HAVING_KW),
    ("IGNORE", SyntaxKind::IGNORE_KW),
    ("IN", SyntaxKind::IN_KW),
    ("INNER", SyntaxKind::INNER_KW),
    ("INTERSECT", SyntaxKind::INTERSECT_KW),
    ("INTERVAL", SyntaxKind::INTERVAL_KW),
    ("IS", SyntaxKind::IS_KW),
    ("JOIN", SyntaxKind::JOIN_KW),
    ("LEFT", SyntaxKind::LEFT_KW),
    ("LIKE", SyntaxKind::LIKE_KW),
    ("LIMIT", SyntaxKind::LIMIT_KW),
    ("NOT", SyntaxKind::NOT_KW),
    ("NULL", SyntaxKind::NULL_KW),
    ("NULLS", SyntaxKind::NULLS_KW),
    ("ON", SyntaxKind::ON_KW),
    ("OR", SyntaxKind::OR_KW),
    ("ORDER", SyntaxKind::ORDER_KW),
    ("OUTER", SyntaxKind::OUTER_KW),
    ("OVER", SyntaxKind::OVER_KW),
    ("PARTITION", SyntaxKind::PARTITION_KW),
    ("PRECEDING", SyntaxKind::PRECEDING_KW),
    ("QUALIFY", SyntaxKind::QUALIFY_KW),
    ("RANGE", SyntaxKind::RANGE_KW),
    ("RECURSIVE", SyntaxKind::RECURSIVE_KW),
    ("RESPECT", SyntaxKind::RESPECT_KW),
    ("RIGHT", SyntaxKind::RIGHT_KW),
    ("ROWS", SyntaxKind::ROWS_KW),
    ("SELECT", SyntaxKind::SELECT_KW),
    ("STRUCT", SyntaxKind::STRUCT_KW),
    ("THEN", SyntaxKind::THEN_KW),
    ("TO", SyntaxKind::TO_KW),
    ("TRUE", SyntaxKind::TRUE_KW),
    ("UNBOUNDED", SyntaxKind::UNBOUNDED_KW),
    ("UNION", SyntaxKind::UNION_KW),
    ("UNNEST", SyntaxKind::UNNEST_KW),
    ("USING", SyntaxKind::USING_KW),
    ("WHEN", SyntaxKind::WHEN_KW),
    ("WHERE", SyntaxKind::WHERE_KW),
    ("WINDOW", SyntaxKind::WINDOW_KW),
    ("WITH", SyntaxKind::WITH_KW),
];

/// Keywords that double as identifiers outside the constructs that use them
pub const NON_RESERVED: &[(&str, SyntaxKind)] = &[
    ("BIGNUMERIC", SyntaxKind::BIGNUMERIC_KW),
    ("DATE", SyntaxKind::DATE_KW),
    ("DATETIME", SyntaxKind::DATETIME_KW),
    ("FIRST", SyntaxKind::FIRST_KW),
    ("JSON", SyntaxKind::JSON_KW),
    ("LAST", SyntaxKind::LAST_KW),
    ("NUMERIC", SyntaxKind::NUMERIC_KW),
    ("OFFSET", SyntaxKind::OFFSET_KW),
    ("REPLACE", SyntaxKind::REPLACE_KW),
    ("ROW", SyntaxKind::ROW_KW),
    ("SAFE_CAST", SyntaxKind::SAFE_CAST_KW),
    ("TIME", SyntaxKind::TIME_KW),
    ("TIMESTAMP", SyntaxKind::TIMESTAMP_KW),
    ("VALUE", SyntaxKind::VALUE_KW),
];

const MAX_KEYWORD_LEN: usize = 16;

static KEYWORDS: Lazy<FxHashMap<&'static str, SyntaxKind>> = Lazy::new(|| {
    RESERVED
        .iter()
        .chain(NON_RESERVED.iter())
        .map(|&(text, kind)| (text, kind))
        .collect()
});

/// Look up the keyword kind of an identifier, ignoring ASCII case.
pub fn keyword_kind(ident: &str) -> Option<SyntaxKind> {
    if ident.len() > MAX_KEYWORD_LEN || !ident.is_ascii() {
        return None;
    }
    let mut buf = [0u8; MAX_KEYWORD_LEN];
    let upper = &mut buf[..ident.len()];
    upper.copy_from_slice(ident.as_bytes());
    upper.make_ascii_uppercase();
    let upper = std::str::from_utf8(upper).ok()?;
    KEYWORDS.get(upper).copied()
}

/// Canonical spelling of a keyword kind.
pub fn keyword_text(kind: SyntaxKind) -> Option<&'static str> {
    RESERVED
        .iter()
        .chain(NON_RESERVED.iter())
        .find(|&&(_, k)| k == kind)
        .map(|&(text, _)| text)
}
