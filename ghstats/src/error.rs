#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the ghstats crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.
//!
//! Every variant is terminal: nothing in the crate retries or degrades after
//! an error is produced. The CLI prints the message and exits non-zero.

use std::path::{Path, PathBuf};

/// Unified error type returned by the API client, aggregation helpers and
/// the CLI.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// The API answered 404 for a request made on behalf of `identity`.
    #[error("user '{identity}' not found")]
    NotFound {
        /// Username the failing request was issued for.
        identity: String
    },
    /// The API answered 403, which GitHub uses for exhausted quotas.
    #[error("API rate limit exceeded. Use a GitHub token for higher limits.")]
    QuotaExceeded,
    /// Any other non-success HTTP status.
    #[error("GitHub API error ({status}): {message}")]
    RemoteApi {
        /// HTTP status code reported by the API.
        status:  u16,
        /// Message extracted from the error payload.
        message: String
    },
    /// Transport-level failure: DNS, refused connection, timeout.
    #[error("network error: {message}")]
    Network {
        /// Rendered description of the underlying transport error.
        message: String
    },
    /// A successful response did not match the expected shape.
    #[error("failed to decode API response: {message}")]
    Decode {
        /// Decoder diagnostics.
        message: String
    },
    /// Returned when user input or settings violate invariants.
    #[error("invalid input: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Wraps I/O errors that occur while reading the settings file.
    #[error("failed to read settings from {path:?}: {source}")]
    Io {
        /// Location of the settings file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse settings: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Wraps I/O errors raised while writing command output.
    #[error("failed to write output: {source}")]
    Output {
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps serialization errors when writing JSON output.
    #[error("failed to serialize output: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    }
}

impl Error {
    /// Constructs a validation error from the provided message.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a [`Error::NotFound`] for the given identity.
    pub fn not_found<I>(identity: I) -> Self
    where
        I: Into<String>
    {
        Self::NotFound {
            identity: identity.into()
        }
    }

    /// Constructs a [`Error::RemoteApi`] from a status code and message.
    pub fn remote_api<M>(status: u16, message: M) -> Self
    where
        M: Into<String>
    {
        Self::RemoteApi {
            status,
            message: message.into()
        }
    }

    /// Constructs a [`Error::Network`] from any displayable transport cause.
    pub fn network<C>(cause: C) -> Self
    where
        C: std::fmt::Display
    {
        Self::Network {
            message: cause.to_string()
        }
    }

    /// Constructs a [`Error::Decode`] from any displayable decoder cause.
    pub fn decode<C>(cause: C) -> Self
    where
        C: std::fmt::Display
    {
        Self::Decode {
            message: cause.to_string()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

/// Maps a non-success HTTP status to the matching error variant.
///
/// `identity` is the username the request was made for and is only used for
/// [`Error::NotFound`].
pub fn status_error(status: u16, message: &str, identity: &str) -> Error {
    match status {
        404 => Error::not_found(identity),
        403 => Error::QuotaExceeded,
        _ => Error::remote_api(status, message)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

/// Creates an [`Error::Output`] variant for a failed write to the output
/// stream.
pub fn output_error(source: std::io::Error) -> Error {
    Error::Output {
        source
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the settings file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}
