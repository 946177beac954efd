//! Line-delimited JSON transport.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use parkmyst_core::event::Event;
use parkmyst_core::feed::{Feed, FeedNotifier};
use parkmyst_runtime::GameHandle;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{debug, warn};

use crate::error::HostError;

/// Source of participant events.
#[async_trait]
pub trait InboundTransport: Send {
    /// Next event, or `None` once the source is exhausted.
    async fn next_event(&mut self) -> Result<Option<Event>, HostError>;
}

/// Reads one JSON event per line. Blank and malformed lines are skipped.
#[derive(Debug)]
pub struct LineTransport<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> LineTransport<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> InboundTransport for LineTransport<R> {
    async fn next_event(&mut self) -> Result<Option<Event>, HostError> {
        while let Some(line) = self.lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Event>(line) {
                Ok(event) => return Ok(Some(event)),
                Err(err) => warn!(error = %err, "malformed event line skipped"),
            }
        }
        Ok(None)
    }
}

/// Forwards every inbound event to the game until the source is exhausted.
/// Returns the number of events forwarded.
///
/// # Errors
///
/// Returns `HostError::Io` if reading fails and `HostError::Game` if the game
/// has stopped.
pub async fn pump<T: InboundTransport>(
    transport: &mut T,
    handle: &GameHandle,
) -> Result<u64, HostError> {
    let mut forwarded = 0;
    while let Some(event) = transport.next_event().await? {
        debug!(topic = %event.topic, "event received");
        handle.publish(event).await?;
        forwarded += 1;
    }
    Ok(forwarded)
}

#[derive(Serialize)]
struct FeedLine<'a> {
    change: &'static str,
    feed: &'a Feed,
}

/// Writes every feed change as one JSON line.
#[derive(Debug)]
pub struct JsonLineNotifier<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonLineNotifier<W> {
    /// Writes to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, change: &'static str, feed: &Feed) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let written = serde_json::to_writer(&mut *out, &FeedLine { change, feed })
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(out))
            .and_then(|()| out.flush());
        if let Err(err) = written {
            warn!(feed = %feed.id, change, error = %err, "feed change not written");
        }
    }
}

impl<W: Write + Send> FeedNotifier for JsonLineNotifier<W> {
    fn feed_created(&self, feed: &Feed) {
        self.write("created", feed);
    }

    fn feed_updated(&self, feed: &Feed) {
        self.write("updated", feed);
    }

    fn feed_removed(&self, feed: &Feed) {
        self.write("removed", feed);
    }
}
