pub mod engine;
pub mod json;
pub mod model;
pub mod parser;
pub mod validate;

pub use engine::{Engine, EngineError};
pub use model::{Account, InstructionType, Status, StatusCode, TransactionResult};
pub use parser::parse_instruction;
