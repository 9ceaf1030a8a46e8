//! Instruction processing engine.
//!
//! The engine runs one parsed instruction through a fixed chain of business
//! checks and produces exactly one [`TransactionResult`] per request. Checks
//! run in a set order and the first violation is terminal, so every failure
//! carries the single status code of the rule that tripped. Rule violations
//! are results, not errors; `Err` is reserved for internal faults.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::model::{Account, ParsedInstruction, Status, StatusCode, TransactionResult};
use crate::parser::parse_instruction;
use crate::validate::{self, DateRelation};

mod error;
pub use error::EngineError;

mod outcome;
use outcome::Outcome;

/// The instruction processing engine.
///
/// Carries the reference date used to classify execute-by dates. Callers
/// inject it once at construction, which keeps processing deterministic and
/// lets tests pin the date-boundary behavior.
pub struct Engine {
    today: NaiveDate,
}

/// Public API
impl Engine {
    /// Create an engine that classifies execute-by dates against `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Run one instruction against the supplied accounts.
    ///
    /// The accounts are only read; callers see balance movement exclusively
    /// through the snapshots in the result. Every reachable outcome is a
    /// terminal result, and two calls with equal inputs produce equal
    /// results.
    pub fn process(
        &self,
        accounts: &[Account],
        instruction: &str,
    ) -> Result<TransactionResult, EngineError> {
        let Some(parsed) = parse_instruction(instruction) else {
            warn!(code = %StatusCode::Sy03, "instruction could not be parsed");
            return Ok(outcome::unparseable());
        };

        let result = self.evaluate(accounts, &parsed)?;
        Self::log_outcome(&result);
        Ok(result)
    }
}

/// Private API
impl Engine {
    /// Run the business checks in order; the first violation decides the
    /// result.
    fn evaluate(
        &self,
        accounts: &[Account],
        parsed: &ParsedInstruction,
    ) -> Result<TransactionResult, EngineError> {
        let mut outcome = Outcome::new(accounts, parsed);

        let Some(amount) = validate::parse_amount(&parsed.amount) else {
            return Ok(outcome.reject_all(
                StatusCode::Am01,
                format!("amount {:?} is not a positive integer", parsed.amount),
            ));
        };
        outcome.set_amount(amount);

        if !validate::is_valid_account_id(&parsed.debit_account_id) {
            return Ok(outcome.reject_all(
                StatusCode::Ac04,
                format!("debit account id {:?} is malformed", parsed.debit_account_id),
            ));
        }
        if !validate::is_valid_account_id(&parsed.credit_account_id) {
            return Ok(outcome.reject_all(
                StatusCode::Ac04,
                format!(
                    "credit account id {:?} is malformed",
                    parsed.credit_account_id
                ),
            ));
        }

        let execute_date = match parsed.execute_by.as_deref() {
            Some(raw) => match validate::parse_execute_date(raw) {
                Some(date) => Some(date),
                None => {
                    return Ok(outcome.reject_all(
                        StatusCode::Dt01,
                        format!("execute-by date {raw:?} is not a valid calendar date"),
                    ));
                }
            },
            None => None,
        };

        if !validate::is_supported_currency(&parsed.currency) {
            return Ok(outcome.reject_all(
                StatusCode::Cu02,
                format!("currency {} is not supported", parsed.currency),
            ));
        }
        if parsed.debit_account_id == parsed.credit_account_id {
            return Ok(outcome.reject_all(
                StatusCode::Ac02,
                "debit and credit accounts must differ".to_string(),
            ));
        }

        // Party ids are well formed and distinct from here on, so failures
        // echo only the accounts that resolve.
        let Some(debit_account) = find_account(accounts, &parsed.debit_account_id) else {
            return Ok(outcome.reject_parties(
                StatusCode::Ac03,
                format!("debit account {:?} not found", parsed.debit_account_id),
            ));
        };
        let Some(credit_account) = find_account(accounts, &parsed.credit_account_id) else {
            return Ok(outcome.reject_parties(
                StatusCode::Ac03,
                format!("credit account {:?} not found", parsed.credit_account_id),
            ));
        };

        if debit_account.currency != credit_account.currency {
            return Ok(outcome.reject_parties(
                StatusCode::Cu01,
                "debit and credit account currencies do not match".to_string(),
            ));
        }
        if parsed.currency != debit_account.currency {
            return Ok(outcome.reject_parties(
                StatusCode::Cu01,
                format!(
                    "instruction currency {} does not match debit account currency {}",
                    parsed.currency, debit_account.currency
                ),
            ));
        }
        if debit_account.balance < amount {
            return Ok(outcome.reject_parties(
                StatusCode::Ac01,
                format!(
                    "insufficient funds in debit account {:?}: balance {}, requested {}",
                    debit_account.id, debit_account.balance, amount
                ),
            ));
        }

        // Executable. A future execute-by date defers settlement; a past or
        // today's date, or no date at all, settles immediately.
        if let (Some(date), Some(raw)) = (execute_date, parsed.execute_by.as_deref()) {
            if validate::classify_date(date, self.today) == DateRelation::Future {
                return Ok(outcome.pending(raw));
            }
        }

        let new_debit = debit_account
            .balance
            .checked_sub(amount)
            .ok_or_else(|| EngineError::BalanceOverflow {
                account: debit_account.id.clone(),
            })?;
        let new_credit = credit_account
            .balance
            .checked_add(amount)
            .ok_or_else(|| EngineError::BalanceOverflow {
                account: credit_account.id.clone(),
            })?;
        Ok(outcome.executed(new_debit, new_credit))
    }

    /// Small helper to log terminal results
    fn log_outcome(result: &TransactionResult) {
        match result.status {
            Status::Successful => {
                info!(code = %result.status_code, amount = result.amount, "transfer executed");
            }
            Status::Pending => {
                info!(
                    code = %result.status_code,
                    execute_by = result.execute_by.as_deref(),
                    "transfer scheduled"
                );
            }
            Status::Failed => {
                info!(
                    code = %result.status_code,
                    reason = %result.status_reason,
                    "transfer rejected"
                );
            }
        }
    }
}

fn find_account<'a>(accounts: &'a [Account], id: &str) -> Option<&'a Account> {
    accounts.iter().find(|account| account.id == id)
}
