//! Line-oriented ingestion: text in, events routed to a named pipeline.

use crate::{
    error::{IngestError, LineError},
    orchestrator::Registry,
};
use statefold_core::Event;
use std::borrow::Cow;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{error, warn};

/// Annotation key carrying the raw input text of an event.
pub const RAW_TEXT_KEY: &str = "val";

/// Parses one input line into an [`Event`].
///
/// A single trailing `\n` or `\r\n` is stripped first. The value must be a
/// finite `f64`; the stripped text is kept under [`RAW_TEXT_KEY`].
///
/// ```rust
/// use statefold::ingest::{RAW_TEXT_KEY, parse_line};
///
/// let event = parse_line("3.5\n").unwrap();
/// assert_eq!(event.value, 3.5);
/// assert_eq!(event.annotation(RAW_TEXT_KEY), Some("3.5"));
/// assert!(parse_line("abc\n").is_err());
/// ```
pub fn parse_line(line: &str) -> Result<Event, IngestError> {
    let text = strip_terminator(line);
    let value: f64 = text.parse().map_err(|source| IngestError::Parse {
        line: text.to_string(),
        source,
    })?;
    if !value.is_finite() {
        return Err(IngestError::NonFinite {
            line: text.to_string(),
        });
    }
    Ok(Event::new(value).with_annotation(RAW_TEXT_KEY, text))
}

/// Like [`parse_line`], for raw input bytes. Bytes that are not UTF-8 are
/// rejected as [`IngestError::NotUtf8`].
pub fn parse_bytes(line: &[u8]) -> Result<Event, IngestError> {
    match std::str::from_utf8(line) {
        Ok(text) => parse_line(text),
        Err(source) => Err(IngestError::NotUtf8 {
            line: lossy(line).into_owned(),
            source,
        }),
    }
}

fn strip_terminator(line: &str) -> &str {
    match line.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => line,
    }
}

fn lossy(line: &[u8]) -> Cow<'_, str> {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line)
}

/// Counts of what happened to each input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestReport {
    /// Lines parsed and accepted by the target pipeline.
    pub accepted: u64,
    /// Lines that failed to parse.
    pub rejected: u64,
    /// Lines that parsed but could not be delivered.
    pub unrouted: u64,
}

/// Reads lines, parses them and routes the resulting events to one pipeline.
pub struct Ingestor<'a> {
    registry: &'a Registry,
    route: String,
}

impl<'a> Ingestor<'a> {
    /// Route every parsed line to the pipeline called `route`.
    pub fn new(registry: &'a Registry, route: impl Into<String>) -> Self {
        Self {
            registry,
            route: route.into(),
        }
    }

    /// The target pipeline's name.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Parses and routes one line, returning the error that stopped it.
    ///
    /// Parse failures come back as [`LineError::Parse`] and never reach a
    /// pipeline.
    pub async fn ingest_line(&self, line: &str) -> Result<(), LineError> {
        let event = parse_line(line).map_err(LineError::Parse)?;
        self.deliver(event).await
    }

    /// [`Ingestor::ingest_line`] for raw bytes.
    pub async fn ingest_bytes(&self, line: &[u8]) -> Result<(), LineError> {
        let event = parse_bytes(line).map_err(LineError::Parse)?;
        self.deliver(event).await
    }

    async fn deliver(&self, event: Event) -> Result<(), LineError> {
        self.registry
            .route(&self.route, event)
            .await
            .map_err(LineError::Route)
    }

    /// Consumes `reader` to EOF.
    ///
    /// Bad lines, including ones that are not UTF-8, are logged and skipped;
    /// only a read failure ends the loop early.
    pub async fn run<R>(&self, mut reader: R) -> Result<IngestReport, IngestError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut report = IngestReport::default();
        let mut line = Vec::new();

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line).await? == 0 {
                break;
            }
            match self.ingest_bytes(&line).await {
                Ok(()) => report.accepted += 1,
                Err(LineError::Parse(err)) => {
                    report.rejected += 1;
                    warn!(error = %err, "error getting float; line skipped");
                }
                Err(LineError::Route(err)) => {
                    report.unrouted += 1;
                    error!(route = %self.route, error = %err, "event could not be routed; line skipped");
                }
            }
        }

        Ok(report)
    }
}
