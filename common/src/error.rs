use std::fmt;
use std::io;
use std::net::IpAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Every failure the alias subsystem can report.
#[derive(Debug, Error)]
pub enum AliasError {
    /// A hostname, IP address or bind address could not be used.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// There is no loopback alias strategy for the running OS.
    #[error("runtime is {0} - can't set up a loopback alias")]
    PlatformUnsupported(String),

    /// An external command failed or printed something unexpected.
    #[error("{command} failed: {reason}")]
    Exec { command: String, reason: String },

    /// The hosts file could not be read or replaced.
    #[error("{}: {source}", .path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The hosts file already mentions this IP address.
    #[error("{} already contains the IP address {ip}", .path.display())]
    AlreadyPresent { path: PathBuf, ip: IpAddr },

    /// One or more teardown steps failed. Every step was still attempted.
    #[error("teardown failed: {}", JoinedErrors(.0))]
    Teardown(Vec<AliasError>),
}

impl AliasError {
    pub fn file_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileIo {
            path: path.into(),
            source,
        }
    }

    /// Collapses the results of independent teardown steps into one result.
    ///
    /// Nested `Teardown` errors are flattened so the report stays one level deep.
    pub fn join(results: impl IntoIterator<Item = Result<(), AliasError>>) -> Result<(), AliasError> {
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(()) => {}
                Err(AliasError::Teardown(inner)) => errors.extend(inner),
                Err(err) => errors.push(err),
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AliasError::Teardown(errors))
        }
    }

    /// True when the failure most likely comes from missing privileges.
    pub fn is_permission_denied(&self) -> bool {
        match self {
            AliasError::FileIo { source, .. } => source.kind() == io::ErrorKind::PermissionDenied,
            AliasError::Exec { reason, .. } => {
                let reason = reason.to_ascii_lowercase();
                reason.contains("permission denied") || reason.contains("operation not permitted")
            }
            AliasError::Teardown(errors) => errors.iter().any(AliasError::is_permission_denied),
            _ => false,
        }
    }
}

struct JoinedErrors<'a>(&'a [AliasError]);

impl fmt::Display for JoinedErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}
