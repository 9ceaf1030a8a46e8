//! Core domain types for the instruction engine.

use std::fmt;

use serde::Serialize;

/// An account supplied by the caller, valid for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    /// Balance in minor units; negative balances are accepted as input.
    pub balance: i64,
    pub currency: String,
}

/// Which side of the transfer the instruction text leads with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstructionType {
    Debit,
    Credit,
}

/// The fields extracted from one instruction, before any validation.
///
/// `amount` keeps the raw token and `execute_by` the verbatim text after the
/// `ON` keyword; the engine decides whether either is usable. The currency is
/// upper-cased by the parser, every other field preserves its original case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInstruction {
    pub r#type: InstructionType,
    pub amount: String,
    pub currency: String,
    pub debit_account_id: String,
    pub credit_account_id: String,
    pub execute_by: Option<String>,
}

/// Terminal disposition of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Successful,
    Pending,
    Failed,
}

/// Outcome taxonomy carried by every result.
///
/// `Sy01` and `Sy02` are reserved: the taxonomy distinguishes missing from
/// misordered keywords, but the parser cannot tell them apart and reports
/// every structural failure as `Sy03`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusCode {
    /// Transfer executed.
    Ap00,
    /// Transfer scheduled for a future date.
    Ap02,
    /// Amount is not a positive integer.
    Am01,
    /// Insufficient funds in the debit account.
    Ac01,
    /// Debit and credit accounts are the same.
    Ac02,
    /// Referenced account not found.
    Ac03,
    /// Malformed account id.
    Ac04,
    /// Currency mismatch across instruction and accounts.
    Cu01,
    /// Unsupported currency.
    Cu02,
    /// Invalid execute-by date.
    Dt01,
    /// Reserved: required keyword missing.
    Sy01,
    /// Reserved: keywords out of order.
    Sy02,
    /// Instruction could not be parsed.
    Sy03,
}

impl StatusCode {
    /// The status every result carrying this code has.
    pub fn status(self) -> Status {
        match self {
            StatusCode::Ap00 => Status::Successful,
            StatusCode::Ap02 => Status::Pending,
            _ => Status::Failed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusCode::Ap00 => "AP00",
            StatusCode::Ap02 => "AP02",
            StatusCode::Am01 => "AM01",
            StatusCode::Ac01 => "AC01",
            StatusCode::Ac02 => "AC02",
            StatusCode::Ac03 => "AC03",
            StatusCode::Ac04 => "AC04",
            StatusCode::Cu01 => "CU01",
            StatusCode::Cu02 => "CU02",
            StatusCode::Dt01 => "DT01",
            StatusCode::Sy01 => "SY01",
            StatusCode::Sy02 => "SY02",
            StatusCode::Sy03 => "SY03",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pre/post view of one party account, echoed in the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSnapshot {
    pub id: String,
    pub balance: i64,
    pub balance_before: i64,
    pub currency: String,
}

/// The single response document produced for every request.
///
/// Instruction fields are `null` until parsing supplied them, `amount` stays
/// `null` until its token validated as a positive integer. `accounts` echoes
/// either every input account or just the resolved parties, depending on how
/// far processing got.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionResult {
    pub r#type: Option<InstructionType>,
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub debit_account: Option<String>,
    pub credit_account: Option<String>,
    pub execute_by: Option<String>,
    pub status: Status,
    pub status_reason: String,
    pub status_code: StatusCode,
    pub accounts: Vec<AccountSnapshot>,
}
