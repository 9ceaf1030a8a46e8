//! Internal fault raised by instruction processing.

use thiserror::Error;

/// Fault returned by [`Engine::process`](super::Engine::process).
///
/// Business-rule violations never show up here; they come back as
/// [`TransactionResult`](crate::model::TransactionResult) values carrying a
/// failure status code. The only fault the engine itself can hit is settling
/// a transfer whose new balance leaves the representable range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("balance overflow while settling account {account}")]
    BalanceOverflow { account: String },
}
