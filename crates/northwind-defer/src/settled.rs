//! Consume a result set in the order entries settle.

use futures::stream::{FuturesUnordered, LocalBoxStream};
use futures::StreamExt;

use crate::entry::ResultSet;

/// A named entry together with its settled outcome.
pub type Settled<T, E> = (String, Result<T, E>);

/// Turn a result set into a stream yielding each entry as it settles.
///
/// Entries that are already settled come out first, in insertion order.
/// Pending entries follow in completion order.
pub fn settle_in_order<'a, T, E>(results: ResultSet<'a, T, E>) -> LocalBoxStream<'a, Settled<T, E>>
where
    T: 'a,
    E: 'a,
{
    let mut ready = Vec::new();
    let pending = FuturesUnordered::new();

    for (name, entry) in results {
        if entry.is_pending() {
            pending.push(async move { (name, entry.settle().await) });
        } else if let Some(result) = entry.into_settled() {
            ready.push((name, result));
        }
    }

    futures::stream::iter(ready).chain(pending).boxed_local()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;
    use crate::entry::Entry;

    fn after<'a>(ms: u64, value: &'static str) -> Entry<'a, &'static str, String> {
        Entry::pending(async move {
            sleep(Duration::from_millis(ms)).await;
            Ok(value)
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_yields_in_settle_order() {
        let set = ResultSet::new()
            .with("a", after(30, "a"))
            .with("b", after(10, "b"))
            .with("c", Entry::Ready("c"))
            .with("d", after(20, "d"));

        let names: Vec<String> = settle_in_order(set).map(|(name, _)| name).collect().await;
        assert_eq!(names, vec!["c", "b", "d", "a"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_yielded() {
        let set = ResultSet::new()
            .with("bad", Entry::<&str, _>::Failed("boom".to_string()))
            .with("ok", after(5, "fine"));

        let items: Vec<_> = settle_in_order(set).collect().await;
        assert_eq!(items[0], ("bad".to_string(), Err("boom".to_string())));
        assert_eq!(items[1], ("ok".to_string(), Ok("fine")));
    }
}
