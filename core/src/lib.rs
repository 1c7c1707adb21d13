//! # Hostalias Core
//!
//! Makes a hostname resolvable on the local machine and guarantees the changes are
//! undone when the process ends.
//!
//! * **[`hosts`]**: Atomic, conservative edits of the hosts file.
//! * **[`loopback`]**: Platform-specific loopback alias control.
//! * **[`alias`]**: Two-phase bring-up with a single rollback handle.
//! * **[`lifecycle`]**: Runs the rollback on shutdown or on SIGINT/SIGTERM.
//!
//! ## Helper Modules
//! * **[`command`]**: Runs and classifies the platform tools.
//! * **[`interface`]**: Reads the kernel's interface table.

pub mod alias;
pub mod command;
pub mod hosts;
pub mod interface;
pub mod lifecycle;
pub mod loopback;

pub use alias::{AliasCoordinator, AliasSession, SessionState, StartError};
pub use hosts::{HostsFile, HostsStore};
pub use lifecycle::{Outcome, ProcessLifecycleHook, TeardownFn, TerminationSignal};
pub use loopback::LoopbackControl;
