//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod convert;

pub(crate) use build::BuildArgs;
pub(crate) use convert::ConvertArgs;
