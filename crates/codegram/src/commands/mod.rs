//! CLI command implementations.

pub(crate) mod common;
pub(crate) mod display;
pub(crate) mod generate;
pub(crate) mod session;

pub(crate) use generate::GenerateArgs;
pub(crate) use session::SessionArgs;
