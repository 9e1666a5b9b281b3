//! The deferred-fetch orchestrator.

use std::future::Future;

use futures::future::{self, join, join_all, LocalBoxFuture};
use futures::FutureExt;

use crate::entry::{Entry, ResultSet};
use crate::settings::RequestSettings;
use crate::timer::Timer;

/// Apply the request's delay and load mode to a set of named results.
///
/// In await mode the returned future completes once a single delay of
/// `settings.delay_ms` has elapsed and every entry has settled; the output
/// holds only `Ready` and `Failed` entries.
///
/// In defer mode the returned future is immediately ready. Each `Pending`
/// entry is replaced by one that settles no earlier than the delay, counted
/// from this call, and no earlier than the underlying value. Settled
/// entries pass through unchanged.
///
/// Key set and key order are preserved in both modes, and failures are
/// carried through untouched.
pub fn maybe_defer<'a, T, E, Tm>(
    settings: RequestSettings,
    results: ResultSet<'a, T, E>,
    timer: &Tm,
) -> LocalBoxFuture<'a, ResultSet<'a, T, E>>
where
    T: 'a,
    E: 'a,
    Tm: Timer + ?Sized,
    Tm::Sleep: 'a,
{
    let delay = settings.delay();
    // Timers start here so their deadlines are anchored at the call.
    let start_sleep = || (!delay.is_zero()).then(|| timer.sleep(delay));

    if settings.should_defer {
        let deferred = results
            .into_iter()
            .map(|(name, entry)| {
                let entry = match entry {
                    Entry::Pending(pending) => {
                        let sleep = start_sleep();
                        Entry::pending(async move { join(wait(sleep), pending).await.1 })
                    }
                    settled => settled,
                };
                (name, entry)
            })
            .collect();
        return future::ready(deferred).boxed_local();
    }

    let sleep = start_sleep();
    async move {
        let settle_all = join_all(
            results
                .into_iter()
                .map(|(name, entry)| async move { (name, Entry::settled(entry.settle().await)) }),
        );
        let ((), settled) = join(wait(sleep), settle_all).await;
        settled.into_iter().collect()
    }
    .boxed_local()
}

async fn wait<S: Future<Output = ()>>(sleep: Option<S>) {
    if let Some(sleep) = sleep {
        sleep.await;
    }
}
