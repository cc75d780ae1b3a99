//! tm-sql - SQL layer for Tidemark
//!
//! This crate splits raw migration SQL into individually executable
//! statements for each supported dialect, and offers a sqlparser-backed
//! syntax check used by `tm validate`.

pub mod dialect;
pub mod error;
pub mod splitter;
pub mod validator;

pub use dialect::Dialect;
pub use error::{SqlError, SqlResult};
pub use splitter::split_statements;
pub use validator::{check_statements, is_procedural_object, StatementIssue};
