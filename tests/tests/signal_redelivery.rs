//! The only test in this binary, because it signals its own process. Redelivery
//! is swapped out here; `signal_exit_status.rs` covers the real one.
#![cfg(unix)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use hostalias_core::{Outcome, ProcessLifecycleHook, TeardownFn, TerminationSignal};
use nix::sys::signal::{Signal, kill};
use nix::unistd::getpid;

#[tokio::test]
async fn sigterm_runs_teardowns_then_redelivers_sigterm() {
    let redelivered = Arc::new(Mutex::new(Vec::new()));
    let sink = redelivered.clone();
    let hook = ProcessLifecycleHook::install()
        .unwrap()
        .with_redeliver(move |sig| {
            sink.lock().unwrap().push(sig);
            Ok(())
        });

    let order = Arc::new(Mutex::new(Vec::new()));
    let torn_down = Arc::new(AtomicUsize::new(0));
    let teardowns: Vec<TeardownFn> = ["hosts", "alias"]
        .into_iter()
        .map(|name| {
            let order = order.clone();
            let torn_down = torn_down.clone();
            let redelivered = redelivered.clone();
            let teardown: TeardownFn = Box::new(move || {
                assert!(redelivered.lock().unwrap().is_empty());
                order.lock().unwrap().push(name);
                torn_down.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
            teardown
        })
        .collect();

    kill(getpid(), Signal::SIGTERM).unwrap();
    let outcome = hook.run(std::future::pending::<()>(), teardowns).await;

    assert_eq!(outcome, Outcome::Signalled(TerminationSignal::Terminate));
    assert_eq!(torn_down.load(Ordering::SeqCst), 2);
    assert_eq!(*order.lock().unwrap(), vec!["hosts", "alias"]);
    assert_eq!(*redelivered.lock().unwrap(), vec![TerminationSignal::Terminate]);
}
