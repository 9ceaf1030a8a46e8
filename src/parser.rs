//! Tokenizing parser for free-text payment instructions.
//!
//! Two fixed formats are recognized, each described by a [`Grammar`]: a head
//! keyword that decides the instruction type, followed by a rigid chain of
//! six keywords. Keywords are matched by case-insensitive substring search,
//! each search starting strictly after the end of the previous match, and the
//! fields are the text between keyword boundaries:
//!
//! ```text
//! DEBIT  <amt> <ccy> FROM ACCOUNT <debit>  FOR CREDIT TO   ACCOUNT <credit> [ON <date>]
//! CREDIT <amt> <ccy> TO   ACCOUNT <credit> FOR DEBIT  FROM ACCOUNT <debit>  [ON <date>]
//! ```
//!
//! Extraction is purely structural: fields come out verbatim (currency
//! upper-cased, ids and date trimmed) and all semantic checks belong to the
//! engine. Any structural mismatch yields `None`.

use crate::model::{InstructionType, ParsedInstruction};

/// One instruction format: the head keyword plus the fixed keyword chain.
///
/// The first account id sits between `chain[1]` and `chain[2]`, the second
/// follows `chain[5]`. Which of the two is the debit side depends on the
/// instruction type.
struct Grammar {
    r#type: InstructionType,
    head: &'static str,
    chain: [&'static str; 6],
}

const GRAMMARS: [Grammar; 2] = [
    Grammar {
        r#type: InstructionType::Debit,
        head: "DEBIT",
        chain: ["FROM", "ACCOUNT", "FOR", "CREDIT", "TO", "ACCOUNT"],
    },
    Grammar {
        r#type: InstructionType::Credit,
        head: "CREDIT",
        chain: ["TO", "ACCOUNT", "FOR", "DEBIT", "FROM", "ACCOUNT"],
    },
];

/// Optional trailing keyword introducing the execute-by date.
const EXECUTE_BY_KEYWORD: &str = "ON";

/// Parse an instruction into its fields, or `None` when the text does not
/// follow either grammar.
pub fn parse_instruction(text: &str) -> Option<ParsedInstruction> {
    let text = text.trim();
    let grammar = GRAMMARS
        .iter()
        .find(|grammar| starts_with_keyword(text, grammar.head))?;

    // Walk the keyword chain; every search starts where the previous keyword
    // ended, which is what enforces the order.
    let mut spans = [(0usize, 0usize); 6];
    let mut cursor = grammar.head.len();
    for (span, keyword) in spans.iter_mut().zip(grammar.chain) {
        *span = find_keyword(text, keyword, cursor)?;
        cursor = span.1;
    }

    // Amount and currency are the first two whitespace-separated tokens
    // between the head keyword and the first chain keyword.
    let mut funds = text[grammar.head.len()..spans[0].0].split_whitespace();
    let amount = funds.next()?.to_string();
    let currency = funds.next()?.to_ascii_uppercase();

    let first_id = text[spans[1].1..spans[2].0].trim().to_string();
    let tail = spans[5].1;
    let (second_id, execute_by) = match find_keyword(text, EXECUTE_BY_KEYWORD, tail) {
        Some((on_start, on_end)) => (
            text[tail..on_start].trim().to_string(),
            Some(text[on_end..].trim().to_string()),
        ),
        None => (text[tail..].trim().to_string(), None),
    };

    let (debit_account_id, credit_account_id) = match grammar.r#type {
        InstructionType::Debit => (first_id, second_id),
        InstructionType::Credit => (second_id, first_id),
    };

    Some(ParsedInstruction {
        r#type: grammar.r#type,
        amount,
        currency,
        debit_account_id,
        credit_account_id,
        execute_by,
    })
}

/// Case-insensitive `starts_with` for an ASCII keyword.
fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    text.as_bytes()
        .get(..keyword.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(keyword.as_bytes()))
}

/// Case-insensitive substring search for an ASCII keyword, starting at byte
/// offset `from`; returns the matched byte range. The returned offsets always
/// fall on character boundaries because the keywords are pure ASCII.
fn find_keyword(text: &str, keyword: &str, from: usize) -> Option<(usize, usize)> {
    let haystack = text.as_bytes().get(from..)?;
    haystack
        .windows(keyword.len())
        .position(|window| window.eq_ignore_ascii_case(keyword.as_bytes()))
        .map(|at| (from + at, from + at + keyword.len()))
}
