use thiserror::Error;

/// A build setting that violates its invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("base path must not be empty")]
    EmptyBasePath,

    #[error("base path '{0}' must start and end with '/'")]
    BasePathNotDelimited(String),

    #[error("plugin #{0} has an empty name")]
    EmptyPluginName(usize),

    #[error("alias prefix must not be empty")]
    EmptyAliasKey,

    #[error("alias '{0}' points at an empty path")]
    EmptyAliasTarget(String),

    #[error("alias '{0}' points at a relative path; resolve it against the project root first")]
    RelativeAliasTarget(String),

    #[error("output directory must not be empty")]
    EmptyOutputDirectory,

    #[error("dev-server port {0} is outside 1..=65535")]
    PortOutOfRange(i64),
}

