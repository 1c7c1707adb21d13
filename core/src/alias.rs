//! # Alias Lifecycle Coordinator
//!
//! Brings a hostname up on the local machine in two steps and hands back a single
//! teardown that undoes exactly what was applied:
//!
//! ```text
//! start():   loopback.add() ──▶ hosts.exists(ip)? ──no──▶ hosts.add_entry()
//!                                        │yes
//!                                        ▼
//!                                  (entry skipped)
//!
//! teardown(): hosts.remove_entry()  [only if start added it]
//!             loopback.remove()     [always, once the alias was added]
//! ```
//!
//! The teardown runs in reverse order of application and every step is attempted
//! even when an earlier one fails.

use std::fmt;
use std::net::{IpAddr, ToSocketAddrs};
use std::sync::{Arc, Mutex, PoisonError};

use hostalias_common::network::HostEntry;
use hostalias_common::{AliasConfig, AliasError};
use tracing::{info, warn};

use crate::hosts::{HostsFile, HostsStore};
use crate::lifecycle::TeardownFn;
use crate::loopback::{self, LoopbackControl};

/// Where an [`AliasSession`] is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing has been applied.
    Idle,
    /// The loopback alias is up; the hosts step has not run yet.
    AliasAdded,
    /// The alias is up but the hosts step failed. Teardown removes the alias.
    AliasAddedHostsFailed,
    /// Both steps finished. `hosts_entry` is false when an existing mapping was left in place.
    Active { hosts_entry: bool },
    /// Teardown has run. Further teardowns are no-ops.
    TornDown,
}

/// The live result of [`AliasCoordinator::start`].
///
/// Cloning is cheap and every clone shares the same state, so the teardown runs at
/// most once no matter which clone invokes it.
#[derive(Clone)]
pub struct AliasSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    entry: HostEntry,
    loopback: Arc<dyn LoopbackControl>,
    hosts: Arc<dyn HostsStore>,
    state: Mutex<SessionState>,
}

impl AliasSession {
    fn new(entry: HostEntry, loopback: Arc<dyn LoopbackControl>, hosts: Arc<dyn HostsStore>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                entry,
                loopback,
                hosts,
                state: Mutex::new(SessionState::Idle),
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.lock()
    }

    pub fn alias_applied(&self) -> bool {
        matches!(
            self.state(),
            SessionState::AliasAdded | SessionState::AliasAddedHostsFailed | SessionState::Active { .. }
        )
    }

    pub fn hosts_entry_applied(&self) -> bool {
        self.state() == SessionState::Active { hosts_entry: true }
    }

    pub fn entry(&self) -> &HostEntry {
        &self.inner.entry
    }

    /// Undoes whatever `start` applied: hosts entry first, then the loopback alias.
    ///
    /// Safe to call repeatedly; only the first call touches the system. Failures of
    /// individual steps are collected into `AliasError::Teardown`.
    pub fn teardown(&self) -> Result<(), AliasError> {
        let mut state = self.lock();
        let (remove_entry, remove_alias) = match *state {
            SessionState::Idle | SessionState::TornDown => (false, false),
            SessionState::AliasAdded | SessionState::AliasAddedHostsFailed => (false, true),
            SessionState::Active { hosts_entry } => (hosts_entry, true),
        };
        *state = SessionState::TornDown;

        let mut results = Vec::with_capacity(2);
        if remove_entry {
            results.push(self.inner.hosts.remove_entry(&self.inner.entry).map(|removed| {
                if !removed {
                    warn!("Hosts entry {} was already gone", self.inner.entry);
                }
            }));
        }
        if remove_alias {
            results.push(self.inner.loopback.remove());
        }
        AliasError::join(results)
    }

    /// Packages the teardown for [`crate::lifecycle::ProcessLifecycleHook`].
    pub fn into_teardown_fn(self) -> TeardownFn {
        Box::new(move || self.teardown())
    }

    fn transition(&self, next: SessionState) {
        *self.lock() = next;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionState> {
        // The guarded value is a plain enum, so a poisoned lock still holds a usable state.
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for AliasSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AliasSession")
            .field("entry", &self.inner.entry)
            .field("alias", self.inner.loopback.alias())
            .field("state", &self.state())
            .finish()
    }
}

/// A failed [`AliasCoordinator::start`].
///
/// `session` still has to be torn down: it rolls back whatever was applied before
/// the failure.
#[derive(Debug)]
pub struct StartError {
    pub error: AliasError,
    pub session: AliasSession,
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl std::error::Error for StartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Orchestrates the loopback alias and the hosts entry for one hostname.
pub struct AliasCoordinator {
    entry: HostEntry,
    comment: String,
    loopback: Arc<dyn LoopbackControl>,
    hosts: Arc<dyn HostsStore>,
}

impl AliasCoordinator {
    /// Builds a coordinator for the running platform from an explicit config.
    pub fn new(cfg: &AliasConfig) -> Result<Self, AliasError> {
        let entry = cfg.host_entry()?;
        let loopback = loopback::from_config(cfg)?;
        let hosts: Arc<dyn HostsStore> = Arc::new(HostsFile::new(cfg.hosts_file.clone()));
        Ok(Self::with_parts(entry, &cfg.comment, loopback, hosts))
    }

    pub fn with_parts(
        entry: HostEntry,
        comment: &str,
        loopback: Arc<dyn LoopbackControl>,
        hosts: Arc<dyn HostsStore>,
    ) -> Self {
        Self {
            entry,
            comment: comment.to_string(),
            loopback,
            hosts,
        }
    }

    pub fn host(&self) -> &str {
        self.entry.host()
    }

    pub fn ip(&self) -> IpAddr {
        self.entry.ip()
    }

    /// Adds the loopback alias, then the hosts entry unless the IP is already mapped.
    ///
    /// On failure the returned [`StartError`] carries a session that rolls back the
    /// alias if it was added.
    pub fn start(&self) -> Result<AliasSession, StartError> {
        let session = AliasSession::new(self.entry.clone(), self.loopback.clone(), self.hosts.clone());
        let fail = |error: AliasError, session: AliasSession| StartError { error, session };

        if let Err(err) = self.loopback.add() {
            return Err(fail(err, session));
        }
        session.transition(SessionState::AliasAdded);

        let already_mapped = match self.hosts.exists(self.entry.ip()) {
            Ok(exists) => exists,
            Err(err) => {
                session.transition(SessionState::AliasAddedHostsFailed);
                return Err(fail(err, session));
            }
        };

        if already_mapped {
            warn!(
                "Hosts file already mentions {}; leaving it untouched",
                self.entry.ip()
            );
            session.transition(SessionState::Active { hosts_entry: false });
            return Ok(session);
        }

        if let Err(err) = self.hosts.add_entry(&self.entry, &self.comment) {
            session.transition(SessionState::AliasAddedHostsFailed);
            return Err(fail(err, session));
        }
        session.transition(SessionState::Active { hosts_entry: true });
        info!("{} is now local", self.entry);
        Ok(session)
    }

    /// Whether the hostname already resolves to the bind IP through the system resolver.
    pub fn exists(&self) -> Result<bool, AliasError> {
        let addrs = (self.entry.host(), 0)
            .to_socket_addrs()
            .map_err(|e| AliasError::Config(format!("cannot resolve {}: {e}", self.entry.host())))?;
        Ok(addrs.map(|addr| addr.ip()).any(|ip| ip == self.entry.ip()))
    }

    /// Hostnames that can be advertised as reachable on this machine.
    pub fn resolvable_hosts(&self) -> Vec<String> {
        match self.exists() {
            Ok(true) => vec![self.entry.host().to_string()],
            Ok(false) => {
                warn!("{} does not resolve to {}", self.entry.host(), self.entry.ip());
                Vec::new()
            }
            Err(err) => {
                warn!("{err}");
                Vec::new()
            }
        }
    }

    /// Best-effort cleanup of a previous run that never got to tear down.
    ///
    /// Removes a matching hosts entry and the loopback alias without knowing whether
    /// either is present, so a missing alias shows up as an error from the platform tool.
    pub fn release(&self) -> Result<bool, AliasError> {
        let removed = self.hosts.remove_entry(&self.entry);
        let alias = self.loopback.remove();
        let entry_removed = matches!(removed, Ok(true));
        AliasError::join([removed.map(|_| ()), alias])?;
        Ok(entry_removed)
    }
}
