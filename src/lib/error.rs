// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Coarse error family, used by callers to decide how to report a failure.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum ErrorDomain {
    /// Malformed YAML or schema violation, carries file/line/column.
    Parser,
    /// Semantic rule violation, carries the file name.
    Validation,
    /// Operating system I/O failure.
    File,
    /// Unsupported combination detected by a backend writer.
    Backend,
    /// Failure while serializing back to YAML.
    Emitter,
    /// Context free failure.
    Format,
}

impl std::fmt::Display for ErrorDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Parser => "parser",
                Self::Validation => "validation",
                Self::File => "file",
                Self::Backend => "backend",
                Self::Emitter => "emitter",
                Self::Format => "format",
            }
        )
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum ErrorKind {
    /// YAML syntax error
    InvalidYaml,
    /// Valid YAML which does not follow the netplan schema
    InvalidConfig,
    /// Generic semantic error not tied to a single setting
    ConfigGeneric,
    /// Semantic rule violation of a definition
    ConfigValidation,
    /// I/O failure, the code holds the OS errno
    FileError,
    /// Backend does not support the requested combination
    Unsupported,
    /// Backend specific validation failure
    BackendValidation,
    /// Failed to serialize YAML
    EmitterFailure,
    /// Malformed input without known origin
    InvalidFormat,
    /// Please report this as bug to upstream
    Bug,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidYaml => "invalid-yaml",
            Self::InvalidConfig => "invalid-config",
            Self::ConfigGeneric => "config-generic",
            Self::ConfigValidation => "config-validation",
            Self::FileError => "file-error",
            Self::Unsupported => "unsupported",
            Self::BackendValidation => "backend-validation",
            Self::EmitterFailure => "emitter-failure",
            Self::InvalidFormat => "invalid-format",
            Self::Bug => "bug",
        }
    }

    pub fn domain(&self) -> ErrorDomain {
        match self {
            Self::InvalidYaml | Self::InvalidConfig => ErrorDomain::Parser,
            Self::ConfigGeneric | Self::ConfigValidation => {
                ErrorDomain::Validation
            }
            Self::FileError => ErrorDomain::File,
            Self::Unsupported | Self::BackendValidation => ErrorDomain::Backend,
            Self::EmitterFailure => ErrorDomain::Emitter,
            Self::InvalidFormat | Self::Bug => ErrorDomain::Format,
        }
    }

    /// Numeric code unique within the [ErrorDomain] of this kind.
    /// [ErrorKind::FileError] has no fixed code, see [NetplanError::code()].
    pub fn code(&self) -> u32 {
        match self {
            Self::InvalidYaml
            | Self::ConfigGeneric
            | Self::FileError
            | Self::Unsupported
            | Self::EmitterFailure
            | Self::InvalidFormat => 0,
            Self::InvalidConfig
            | Self::ConfigValidation
            | Self::BackendValidation
            | Self::Bug => 1,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Position of the parse tree node an error originates from.
/// Line and column are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ErrorLocation {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
}

// Try not implement From for NetplanError here unless you are sure this
// error should always convert to certain type of ErrorKind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct NetplanError {
    pub kind: ErrorKind,
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<ErrorLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errno: Option<i32>,
}

impl std::fmt::Display for NetplanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.msg)
    }
}

impl std::error::Error for NetplanError {}

impl NetplanError {
    pub fn new(kind: ErrorKind, msg: String) -> Self {
        Self {
            kind,
            msg,
            location: None,
            errno: None,
        }
    }

    /// Parser domain error pointing at `line` and `column` of `file`.
    pub fn parser_at(
        kind: ErrorKind,
        file: &Path,
        line: usize,
        column: usize,
        detail: &str,
    ) -> Self {
        Self {
            kind,
            msg: format!(
                "{}:{line}:{column}: Error in network definition: {detail}",
                file.display()
            ),
            location: Some(ErrorLocation {
                file: file.to_path_buf(),
                line,
                column,
            }),
            errno: None,
        }
    }

    /// Validation domain error. Validation errors only know the file that
    /// last contributed to the offending definition.
    pub fn validation(file: Option<&Path>, detail: String) -> Self {
        let msg = match file {
            Some(file) => format!(
                "{}: Error in network definition: {detail}",
                file.display()
            ),
            None => format!("Error in network definition: {detail}"),
        };
        Self::new(ErrorKind::ConfigValidation, msg)
    }

    pub fn file_error(path: &Path, e: std::io::Error) -> Self {
        Self {
            kind: ErrorKind::FileError,
            msg: format!("{}: {e}", path.display()),
            location: None,
            errno: e.raw_os_error(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn msg(&self) -> &str {
        self.msg.as_str()
    }

    pub fn domain(&self) -> ErrorDomain {
        self.kind.domain()
    }

    pub fn code(&self) -> u32 {
        if self.kind == ErrorKind::FileError {
            self.errno
                .and_then(|e| u32::try_from(e).ok())
                .unwrap_or_default()
        } else {
            self.kind.code()
        }
    }

    pub fn location(&self) -> Option<&ErrorLocation> {
        self.location.as_ref()
    }
}

impl From<std::io::Error> for NetplanError {
    fn from(e: std::io::Error) -> Self {
        Self {
            kind: ErrorKind::FileError,
            msg: format!("std::io::Error: {e}"),
            location: None,
            errno: e.raw_os_error(),
        }
    }
}
