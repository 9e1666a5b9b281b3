//! Shell-first streaming sink.

use std::fmt::Display;
use std::time::Instant;

use futures::{Sink, SinkExt};
use northwind_core::{LifecyclePhase, PageError, TimingContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SinkState {
    /// Shell not yet sent.
    Initial,
    /// Shell sent, regions can be streamed.
    ShellSent,
    /// Closing HTML sent.
    Completed,
}

/// Streaming sink that enforces the shell-first order.
///
/// Generic over any `Sink<Vec<u8>>`, including Spin's `OutgoingBody` and a
/// plain `Vec<Vec<u8>>` in tests. Each call writes one chunk.
pub struct StreamingSink<S, E>
where
    S: Sink<Vec<u8>, Error = E> + Unpin,
    E: Display,
{
    inner: S,
    state: SinkState,
    timing: TimingContext,
    regions_sent: Vec<String>,
    bytes_sent: usize,
}

impl<S, E> StreamingSink<S, E>
where
    S: Sink<Vec<u8>, Error = E> + Unpin,
    E: Display,
{
    pub fn new(sink: S, timing: TimingContext) -> Self {
        Self {
            inner: sink,
            state: SinkState::Initial,
            timing,
            regions_sent: Vec::new(),
            bytes_sent: 0,
        }
    }

    /// Send the opening shell. Must come before any region.
    pub async fn send_shell(&mut self, html: &str) -> Result<(), PageError> {
        if self.state != SinkState::Initial {
            return Err(PageError::StreamError(
                "Shell already sent or sink completed".to_string(),
            ));
        }

        self.write(html).await?;
        self.timing.mark_shell_sent();
        self.state = SinkState::ShellSent;

        Ok(())
    }

    /// Send a named region's markup.
    ///
    /// Regions may arrive in any order after the shell.
    pub async fn send_region(&mut self, name: &str, html: &str) -> Result<(), PageError> {
        self.ensure_open()?;

        let started = Instant::now();
        self.write(html).await?;
        self.timing.mark_region(name, started);
        self.regions_sent.push(name.to_string());

        Ok(())
    }

    /// Send markup that belongs to no region (scripts, separators).
    pub async fn send_raw(&mut self, html: &str) -> Result<(), PageError> {
        self.ensure_open()?;
        self.write(html).await
    }

    /// Send the closing shell and flush the underlying sink.
    pub async fn finish(&mut self, closing_html: &str) -> Result<(), PageError> {
        self.ensure_open()?;
        self.write(closing_html).await?;
        self.inner
            .flush()
            .await
            .map_err(|e| PageError::StreamError(e.to_string()))?;
        self.state = SinkState::Completed;
        self.timing.mark_complete();
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), PageError> {
        match self.state {
            SinkState::Initial => Err(PageError::ShellNotSent),
            SinkState::Completed => Err(PageError::StreamError(
                "Sink already completed".to_string(),
            )),
            SinkState::ShellSent => Ok(()),
        }
    }

    async fn write(&mut self, html: &str) -> Result<(), PageError> {
        self.inner
            .send(html.as_bytes().to_vec())
            .await
            .map_err(|e| PageError::StreamError(e.to_string()))?;
        self.bytes_sent += html.len();
        Ok(())
    }

    /// Names of the regions sent so far, in send order.
    pub fn regions_sent(&self) -> &[String] {
        &self.regions_sent
    }

    pub fn bytes_sent(&self) -> usize {
        self.bytes_sent
    }

    /// Get the current lifecycle phase.
    pub fn phase(&self) -> LifecyclePhase {
        match (self.state, self.regions_sent.last()) {
            (SinkState::Initial, _) => LifecyclePhase::Start,
            (SinkState::ShellSent, None) => LifecyclePhase::ShellSent,
            (SinkState::ShellSent, Some(last)) => LifecyclePhase::RegionSent(last.clone()),
            (SinkState::Completed, _) => LifecyclePhase::Complete,
        }
    }

    pub fn timing(&self) -> &TimingContext {
        &self.timing
    }

    /// Consume the sink and return the inner value.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    fn sink() -> StreamingSink<Vec<Vec<u8>>, std::convert::Infallible> {
        StreamingSink::new(Vec::new(), TimingContext::new())
    }

    fn chunks(sink: StreamingSink<Vec<Vec<u8>>, std::convert::Infallible>) -> Vec<String> {
        sink.into_inner()
            .into_iter()
            .map(|c| String::from_utf8(c).unwrap())
            .collect()
    }

    #[test]
    fn test_region_before_shell_is_rejected() {
        let mut sink = sink();
        let err = block_on(sink.send_region("customers", "<table>")).unwrap_err();
        assert!(matches!(err, PageError::ShellNotSent));
        assert_eq!(sink.phase(), LifecyclePhase::Start);
    }

    #[test]
    fn test_shell_then_regions_then_finish() {
        let mut sink = sink();
        block_on(async {
            sink.send_shell("<html>").await.unwrap();
            assert_eq!(sink.phase(), LifecyclePhase::ShellSent);
            sink.send_region("b", "<p>b</p>").await.unwrap();
            sink.send_region("a", "<p>a</p>").await.unwrap();
            assert_eq!(sink.phase(), LifecyclePhase::RegionSent("a".to_string()));
            sink.finish("</html>").await.unwrap();
        });

        assert_eq!(sink.phase(), LifecyclePhase::Complete);
        assert_eq!(sink.regions_sent(), ["b", "a"]);
        assert_eq!(sink.bytes_sent(), 6 + 8 + 8 + 7);
        assert!(sink.timing().time_to_shell().is_some());
        assert!(sink.timing().region("a").is_some());
        assert_eq!(chunks(sink), vec!["<html>", "<p>b</p>", "<p>a</p>", "</html>"]);
    }

    #[test]
    fn test_nothing_after_finish() {
        let mut sink = sink();
        block_on(async {
            sink.send_shell("<html>").await.unwrap();
            sink.finish("</html>").await.unwrap();
            assert!(sink.send_raw("<script></script>").await.is_err());
            assert!(sink.send_shell("<html>").await.is_err());
        });
    }
}
