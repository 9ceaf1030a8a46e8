use serde_json::Value;
use std::io::{self, Write};
use thiserror::Error;

use crate::model::{Account, TransactionResult};

/// Errors reported while decoding a request document
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{path}: required field is missing")]
    MissingField { path: String },

    #[error("{path}: expected {expected}")]
    InvalidType { path: String, expected: &'static str },
}

/// A decoded `{accounts, instruction}` request document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub accounts: Vec<Account>,
    pub instruction: String,
}

/// Shape validator for incoming request documents.
///
/// Constructed once and reused across requests. Violations are reported with
/// the path of the offending field, e.g. `$.accounts[0].balance`, and a
/// request that fails here never reaches the engine.
pub struct RequestValidator;

impl RequestValidator {
    pub fn new() -> Self {
        Self
    }

    /// Decode and shape-check one raw request document.
    ///
    /// Balances must be JSON integers; floats and out-of-range numbers are
    /// rejected as type violations. Negative balances pass, the engine deals
    /// with them. Unknown fields are ignored.
    pub fn parse(&self, raw: &str) -> Result<TransferRequest, RequestError> {
        let document: Value = serde_json::from_str(raw)?;
        let root = document
            .as_object()
            .ok_or_else(|| invalid("$", "an object"))?;

        let entries = root
            .get("accounts")
            .ok_or_else(|| missing("$.accounts"))?
            .as_array()
            .ok_or_else(|| invalid("$.accounts", "an array"))?;
        let mut accounts = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            accounts.push(account_at(entry, index)?);
        }

        let instruction = root
            .get("instruction")
            .ok_or_else(|| missing("$.instruction"))?
            .as_str()
            .ok_or_else(|| invalid("$.instruction", "a string"))?
            .to_string();

        Ok(TransferRequest {
            accounts,
            instruction,
        })
    }
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn account_at(entry: &Value, index: usize) -> Result<Account, RequestError> {
    let path = |field: &str| format!("$.accounts[{index}].{field}");
    let fields = entry
        .as_object()
        .ok_or_else(|| invalid(format!("$.accounts[{index}]"), "an object"))?;

    let id = fields
        .get("id")
        .ok_or_else(|| missing(path("id")))?
        .as_str()
        .ok_or_else(|| invalid(path("id"), "a string"))?
        .to_string();

    let balance = fields
        .get("balance")
        .ok_or_else(|| missing(path("balance")))?
        .as_i64()
        .ok_or_else(|| invalid(path("balance"), "an integer"))?;

    let currency = fields
        .get("currency")
        .ok_or_else(|| missing(path("currency")))?
        .as_str()
        .ok_or_else(|| invalid(path("currency"), "a string"))?
        .to_string();

    Ok(Account {
        id,
        balance,
        currency,
    })
}

fn missing(path: impl Into<String>) -> RequestError {
    RequestError::MissingField { path: path.into() }
}

fn invalid(path: impl Into<String>, expected: &'static str) -> RequestError {
    RequestError::InvalidType {
        path: path.into(),
        expected,
    }
}

/// Write one result document as pretty-printed JSON with a trailing newline
pub fn write_result<W: Write>(writer: &mut W, result: &TransactionResult) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, result)?;
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const REQUEST: &str = r#"{
        "accounts": [
            {"id": "a", "balance": 230, "currency": "USD"},
            {"id": "b", "balance": 300, "currency": "USD"}
        ],
        "instruction": "DEBIT 30 USD FROM ACCOUNT a FOR CREDIT TO ACCOUNT b"
    }"#;

    #[test]
    fn parses_full_request() {
        let request = RequestValidator::new().parse(REQUEST).unwrap();

        assert_eq!(request.accounts.len(), 2);
        assert_eq!(request.accounts[0].id, "a");
        assert_eq!(request.accounts[0].balance, 230);
        assert_eq!(request.accounts[1].currency, "USD");
        assert!(request.instruction.starts_with("DEBIT"));
    }

    #[test]
    fn parses_empty_account_list() {
        let request = RequestValidator::new()
            .parse(r#"{"accounts": [], "instruction": "x"}"#)
            .unwrap();
        assert!(request.accounts.is_empty());
    }

    #[test]
    fn accepts_negative_balances() {
        let raw = r#"{"accounts":[{"id":"a","balance":-50,"currency":"USD"}],"instruction":"x"}"#;
        let request = RequestValidator::new().parse(raw).unwrap();
        assert_eq!(request.accounts[0].balance, -50);
    }

    #[test]
    fn ignores_unknown_fields() {
        let raw = r#"{"accounts": [], "instruction": "x", "metadata": {"k": 1}}"#;
        assert!(RequestValidator::new().parse(raw).is_ok());
    }

    #[test]
    fn rejects_syntactically_invalid_json() {
        let err = RequestValidator::new().parse("{not json").unwrap_err();
        assert!(matches!(err, RequestError::Json(_)));
    }

    #[test]
    fn rejects_non_object_root() {
        let err = RequestValidator::new().parse("[1, 2]").unwrap_err();
        assert!(matches!(err, RequestError::InvalidType { ref path, .. } if path == "$"));
    }

    #[test]
    fn reports_missing_top_level_fields() {
        let err = RequestValidator::new()
            .parse(r#"{"instruction": "x"}"#)
            .unwrap_err();
        assert!(matches!(err, RequestError::MissingField { ref path } if path == "$.accounts"));

        let err = RequestValidator::new()
            .parse(r#"{"accounts": []}"#)
            .unwrap_err();
        assert!(matches!(err, RequestError::MissingField { ref path } if path == "$.instruction"));
    }

    #[test]
    fn reports_missing_account_fields_with_index() {
        let raw = r#"{"accounts": [
            {"id": "a", "balance": 1, "currency": "USD"},
            {"id": "b", "currency": "USD"}
        ], "instruction": "x"}"#;
        match RequestValidator::new().parse(raw).unwrap_err() {
            RequestError::MissingField { path } => assert_eq!(path, "$.accounts[1].balance"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_wrongly_typed_fields() {
        let cases = [
            (r#"{"accounts": {}, "instruction": "x"}"#, "$.accounts"),
            (r#"{"accounts": [42], "instruction": "x"}"#, "$.accounts[0]"),
            (
                r#"{"accounts":[{"id":7,"balance":1,"currency":"USD"}],"instruction":"x"}"#,
                "$.accounts[0].id",
            ),
            (
                r#"{"accounts":[{"id":"a","balance":"1","currency":"USD"}],"instruction":"x"}"#,
                "$.accounts[0].balance",
            ),
            (
                r#"{"accounts":[{"id":"a","balance":1,"currency":4}],"instruction":"x"}"#,
                "$.accounts[0].currency",
            ),
            (r#"{"accounts": [], "instruction": 9}"#, "$.instruction"),
        ];
        for (raw, expected_path) in cases {
            let err = RequestValidator::new().parse(raw).unwrap_err();
            assert!(
                matches!(err, RequestError::InvalidType { ref path, .. } if path == expected_path),
                "raw {raw}"
            );
        }
    }

    #[test]
    fn rejects_float_balances() {
        let raw = r#"{"accounts":[{"id":"a","balance":230.0,"currency":"USD"}],"instruction":"x"}"#;
        match RequestValidator::new().parse(raw).unwrap_err() {
            RequestError::InvalidType { path, expected } => {
                assert_eq!(path, "$.accounts[0].balance");
                assert_eq!(expected, "an integer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn validator_is_reusable() {
        let validator = RequestValidator::new();
        assert!(validator.parse(REQUEST).is_ok());
        assert!(validator.parse(REQUEST).is_ok());
        assert!(validator.parse("{}").is_err());
        assert!(validator.parse(REQUEST).is_ok());
    }

    #[test]
    fn error_messages_carry_the_path() {
        let err = missing("$.accounts[0].id");
        assert_eq!(err.to_string(), "$.accounts[0].id: required field is missing");

        let err = invalid("$.accounts[0].balance", "an integer");
        assert_eq!(err.to_string(), "$.accounts[0].balance: expected an integer");
    }

    #[test]
    fn write_result_renders_the_wire_format() {
        use crate::model::{AccountSnapshot, InstructionType, Status, StatusCode};

        let result = TransactionResult {
            r#type: Some(InstructionType::Debit),
            amount: Some(30),
            currency: Some("USD".to_string()),
            debit_account: Some("a".to_string()),
            credit_account: Some("b".to_string()),
            execute_by: None,
            status: Status::Successful,
            status_reason: "transfer executed".to_string(),
            status_code: StatusCode::Ap00,
            accounts: vec![AccountSnapshot {
                id: "a".to_string(),
                balance: 200,
                balance_before: 230,
                currency: "USD".to_string(),
            }],
        };

        let mut buffer = Vec::new();
        write_result(&mut buffer, &result).unwrap();
        assert_eq!(buffer.last(), Some(&b'\n'));

        let rendered: Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(
            rendered,
            json!({
                "type": "DEBIT",
                "amount": 30,
                "currency": "USD",
                "debit_account": "a",
                "credit_account": "b",
                "execute_by": null,
                "status": "successful",
                "status_reason": "transfer executed",
                "status_code": "AP00",
                "accounts": [
                    {"id": "a", "balance": 200, "balance_before": 230, "currency": "USD"}
                ]
            })
        );
    }
}
