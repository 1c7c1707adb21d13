use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::Context;
use hostalias_common::AliasConfig;
use hostalias_core::{AliasCoordinator, Outcome, ProcessLifecycleHook, StartError};
use tracing::{error, info, warn};

use crate::commands::with_root_hint;
use crate::terminal::print;

pub async fn up(cfg: &AliasConfig, hold: Option<Duration>) -> anyhow::Result<()> {
    crate::commands::preflight(cfg);

    // Signal handling has to be live before anything is changed on the system.
    let hook = ProcessLifecycleHook::install().context("installing signal handlers")?;
    let coordinator = AliasCoordinator::new(cfg).map_err(with_root_hint)?;

    let session = match coordinator.start() {
        Ok(session) => session,
        Err(StartError { error, session }) => {
            if let Err(teardown_err) = session.teardown() {
                error!("{teardown_err}");
            }
            return Err(with_root_hint(error));
        }
    };

    print::header("hostname is up");
    let hosts = coordinator.resolvable_hosts();
    if hosts.is_empty() {
        warn!("{} is not resolvable yet; check your resolver configuration", coordinator.host());
    }
    for host in &hosts {
        print::aligned_line("resolvable", 10, host);
    }
    print::aligned_line("address", 10, coordinator.ip());
    print::fat_separator();

    let done: Pin<Box<dyn Future<Output = ()> + Send>> = match hold {
        Some(duration) => {
            info!("Holding for {}s", duration.as_secs());
            Box::pin(tokio::time::sleep(duration))
        }
        None => {
            info!("Press Ctrl-C to tear down");
            Box::pin(std::future::pending())
        }
    };

    let outcome = hook
        .spawn(done, vec![session.into_teardown_fn()])
        .await
        .context("lifecycle task failed")?;
    match outcome {
        Outcome::Done => info!("Torn down"),
        Outcome::Signalled(sig) => warn!("Still running after redelivering {sig}"),
    }
    Ok(())
}
