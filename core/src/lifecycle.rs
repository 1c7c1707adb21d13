//! # Process Lifecycle Hook
//!
//! Races a "done" future against SIGINT/SIGTERM and runs teardown functions on
//! whichever comes first.
//!
//! ```text
//! install()  ── registers SIGINT + SIGTERM listeners (before any resource is acquired)
//! run(done, teardowns)
//!     ├─ done first    → disengage → teardowns
//!     └─ signal first  → disengage → teardowns → redeliver(signal)
//! ```
//!
//! Disengaging puts both signals back to their default disposition, so the signal
//! redelivered at the end terminates the process with the status a supervisor
//! expects instead of being swallowed by the listener.
//!
//! Teardown runs to completion without a timeout. A hook is consumed by `run`.

use std::fmt;
use std::future::Future;
use std::io;

use hostalias_common::AliasError;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// A teardown action handed to the hook.
pub type TeardownFn = Box<dyn FnOnce() -> Result<(), AliasError> + Send>;

type RedeliverFn = Box<dyn Fn(TerminationSignal) -> io::Result<()> + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationSignal {
    Interrupt,
    Terminate,
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationSignal::Interrupt => write!(f, "SIGINT"),
            TerminationSignal::Terminate => write!(f, "SIGTERM"),
        }
    }
}

/// Which side of the race won.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Signalled(TerminationSignal),
}

pub struct ProcessLifecycleHook {
    signals: platform::TerminationSignals,
    redeliver: RedeliverFn,
}

impl ProcessLifecycleHook {
    /// Starts listening for termination signals. Must be called inside a tokio runtime.
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            signals: platform::TerminationSignals::register()?,
            redeliver: Box::new(redeliver),
        })
    }

    /// Replaces the final redelivery step.
    pub fn with_redeliver<F>(mut self, redeliver: F) -> Self
    where
        F: Fn(TerminationSignal) -> io::Result<()> + Send + Sync + 'static,
    {
        self.redeliver = Box::new(redeliver);
        self
    }

    /// Waits for `done` or a termination signal, whichever happens first.
    ///
    /// If both are ready at once, `done` wins.
    pub async fn wait<F>(&mut self, done: F) -> Outcome
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = done => Outcome::Done,
            sig = self.signals.recv() => Outcome::Signalled(sig),
        }
    }

    /// Runs the full race, teardown and redelivery sequence.
    pub async fn run<F>(mut self, done: F, teardowns: Vec<TeardownFn>) -> Outcome
    where
        F: Future<Output = ()>,
    {
        let outcome = self.wait(done).await;
        let Self {
            signals,
            redeliver: redeliver_fn,
        } = self;
        disengage(signals);

        match outcome {
            Outcome::Done => info!("Shutting down"),
            Outcome::Signalled(sig) => info!("Received {sig}, cleaning up"),
        }
        run_teardowns(teardowns);

        if let Outcome::Signalled(sig) = outcome {
            if let Err(err) = redeliver_fn(sig) {
                error!("Failed to redeliver {sig}: {err}");
            }
        }
        outcome
    }

    /// Runs [`ProcessLifecycleHook::run`] on a background task.
    pub fn spawn<F>(self, done: F, teardowns: Vec<TeardownFn>) -> JoinHandle<Outcome>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(self.run(done, teardowns))
    }
}

/// Invokes every teardown in order. Failures are logged and counted, never propagated.
pub fn run_teardowns(teardowns: Vec<TeardownFn>) -> usize {
    let mut failures = 0;
    for teardown in teardowns {
        if let Err(err) = teardown() {
            error!("{err}");
            failures += 1;
        }
    }
    failures
}

fn disengage(signals: platform::TerminationSignals) {
    drop(signals);
    for sig in [TerminationSignal::Interrupt, TerminationSignal::Terminate] {
        if let Err(err) = platform::restore_default(sig) {
            warn!("Could not restore default handling of {sig}: {err}");
        }
    }
}

/// Sends `sig` to this process again now that default handling is restored.
pub fn redeliver(sig: TerminationSignal) -> io::Result<()> {
    platform::redeliver(sig)
}

#[cfg(unix)]
mod platform {
    use std::io;

    use nix::sys::signal::{self, SigHandler, Signal};
    use nix::unistd::getpid;
    use tokio::signal::unix::{self as unix_signal, SignalKind};

    use super::TerminationSignal;

    pub(super) struct TerminationSignals {
        interrupt: unix_signal::Signal,
        terminate: unix_signal::Signal,
    }

    impl TerminationSignals {
        pub(super) fn register() -> io::Result<Self> {
            Ok(Self {
                interrupt: unix_signal::signal(SignalKind::interrupt())?,
                terminate: unix_signal::signal(SignalKind::terminate())?,
            })
        }

        pub(super) async fn recv(&mut self) -> TerminationSignal {
            tokio::select! {
                _ = self.interrupt.recv() => TerminationSignal::Interrupt,
                _ = self.terminate.recv() => TerminationSignal::Terminate,
            }
        }
    }

    fn to_nix(sig: TerminationSignal) -> Signal {
        match sig {
            TerminationSignal::Interrupt => Signal::SIGINT,
            TerminationSignal::Terminate => Signal::SIGTERM,
        }
    }

    pub(super) fn restore_default(sig: TerminationSignal) -> io::Result<()> {
        // SAFETY: SIG_DFL installs no handler code, so nothing can run in signal context.
        unsafe { signal::signal(to_nix(sig), SigHandler::SigDfl) }
            .map(|_| ())
            .map_err(io::Error::from)
    }

    pub(super) fn redeliver(sig: TerminationSignal) -> io::Result<()> {
        restore_default(sig)?;
        signal::kill(getpid(), to_nix(sig)).map_err(io::Error::from)
    }
}

#[cfg(not(unix))]
mod platform {
    use std::io;

    use super::TerminationSignal;

    pub(super) struct TerminationSignals;

    impl TerminationSignals {
        pub(super) fn register() -> io::Result<Self> {
            Ok(Self)
        }

        pub(super) async fn recv(&mut self) -> TerminationSignal {
            let _ = tokio::signal::ctrl_c().await;
            TerminationSignal::Interrupt
        }
    }

    pub(super) fn restore_default(_sig: TerminationSignal) -> io::Result<()> {
        Ok(())
    }

    pub(super) fn redeliver(_sig: TerminationSignal) -> io::Result<()> {
        std::process::exit(130)
    }
}
