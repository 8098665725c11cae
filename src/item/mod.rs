#[cfg(feature = "delimited")]
/// This module provides a delimited line item reader and writer built on `TypeSpec`.
pub mod delimited;
