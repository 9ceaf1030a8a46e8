//! Assembly of terminal results and their account snapshots.
//!
//! Which accounts a result echoes depends on how far processing got:
//! failures before the party accounts are resolvable echo every input
//! account unchanged, later failures and both success shapes echo only the
//! resolved debit and credit accounts, in input order.

use crate::model::{
    Account, AccountSnapshot, ParsedInstruction, Status, StatusCode, TransactionResult,
};

/// Terminal result for text that failed to parse. Nothing about the
/// instruction is known, so every field is `null` and no accounts are echoed.
pub(super) fn unparseable() -> TransactionResult {
    TransactionResult {
        r#type: None,
        amount: None,
        currency: None,
        debit_account: None,
        credit_account: None,
        execute_by: None,
        status: Status::Failed,
        status_reason: "instruction could not be parsed".to_string(),
        status_code: StatusCode::Sy03,
        accounts: Vec::new(),
    }
}

/// Builder for every result shape past the parsing stage.
///
/// Borrows the request for the duration of one evaluation; `amount` is
/// recorded once its token validated, so earlier results carry `null`.
pub(super) struct Outcome<'a> {
    accounts: &'a [Account],
    parsed: &'a ParsedInstruction,
    amount: Option<i64>,
}

impl<'a> Outcome<'a> {
    pub(super) fn new(accounts: &'a [Account], parsed: &'a ParsedInstruction) -> Self {
        Self {
            accounts,
            parsed,
            amount: None,
        }
    }

    pub(super) fn set_amount(&mut self, amount: i64) {
        self.amount = Some(amount);
    }

    /// Failure before the party accounts are resolvable: every input account
    /// is echoed with its balance unchanged.
    pub(super) fn reject_all(&self, code: StatusCode, reason: String) -> TransactionResult {
        self.result(code, reason, self.snapshot_all())
    }

    /// Failure once the party ids are known to be distinct and well formed:
    /// only the accounts that resolved are echoed, balances unchanged.
    pub(super) fn reject_parties(&self, code: StatusCode, reason: String) -> TransactionResult {
        self.result(code, reason, self.snapshot_parties(None))
    }

    /// Valid transfer deferred to a future date; balances stay untouched.
    pub(super) fn pending(&self, execute_by: &str) -> TransactionResult {
        self.result(
            StatusCode::Ap02,
            format!("transfer scheduled for execution on {execute_by}"),
            self.snapshot_parties(None),
        )
    }

    /// Valid transfer settled now, with the post-transfer balances.
    pub(super) fn executed(&self, new_debit: i64, new_credit: i64) -> TransactionResult {
        self.result(
            StatusCode::Ap00,
            "transfer executed".to_string(),
            self.snapshot_parties(Some((new_debit, new_credit))),
        )
    }

    fn result(
        &self,
        status_code: StatusCode,
        status_reason: String,
        accounts: Vec<AccountSnapshot>,
    ) -> TransactionResult {
        TransactionResult {
            r#type: Some(self.parsed.r#type),
            amount: self.amount,
            currency: Some(self.parsed.currency.clone()),
            debit_account: Some(self.parsed.debit_account_id.clone()),
            credit_account: Some(self.parsed.credit_account_id.clone()),
            execute_by: self.parsed.execute_by.clone(),
            status: status_code.status(),
            status_reason,
            status_code,
            accounts,
        }
    }

    fn snapshot_all(&self) -> Vec<AccountSnapshot> {
        self.accounts.iter().map(unchanged).collect()
    }

    /// Snapshot the debit and credit parties in input order, resolving each
    /// id to its first match. Parties that do not resolve are simply absent;
    /// `settled` supplies the post-transfer balances when the transfer
    /// executed.
    fn snapshot_parties(&self, settled: Option<(i64, i64)>) -> Vec<AccountSnapshot> {
        let mut snapshots = Vec::with_capacity(2);
        let (mut debit_seen, mut credit_seen) = (false, false);
        for account in self.accounts {
            let balance = if !debit_seen && account.id == self.parsed.debit_account_id {
                debit_seen = true;
                settled.map(|(debit, _)| debit)
            } else if !credit_seen && account.id == self.parsed.credit_account_id {
                credit_seen = true;
                settled.map(|(_, credit)| credit)
            } else {
                continue;
            };
            snapshots.push(AccountSnapshot {
                id: account.id.clone(),
                balance: balance.unwrap_or(account.balance),
                balance_before: account.balance,
                currency: account.currency.clone(),
            });
        }
        snapshots
    }
}

fn unchanged(account: &Account) -> AccountSnapshot {
    AccountSnapshot {
        id: account.id.clone(),
        balance: account.balance,
        balance_before: account.balance,
        currency: account.currency.clone(),
    }
}
