//! Synchronous execution of the platform network tools.
//!
//! The alias tools do not always report failure through their exit code, so any
//! output on stdout or stderr is treated as a failure as well.

use std::fmt;
use std::process::Command;

use hostalias_common::AliasError;
use tracing::debug;

/// A program plus its arguments, kept separate from execution so the exact
/// invocation can be inspected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Runs the command to completion and classifies the result.
    pub fn run(&self) -> Result<(), AliasError> {
        debug!(command = %self, "running");

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| self.exec_error(e.to_string()))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        let combined = combined.trim();

        if !output.status.success() {
            return Err(self.exec_error(format!("{}: {}", output.status, combined)));
        }
        if !combined.is_empty() {
            return Err(self.exec_error(format!("unexpected output: {combined}")));
        }
        Ok(())
    }

    fn exec_error(&self, reason: String) -> AliasError {
        AliasError::Exec {
            command: self.to_string(),
            reason,
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
