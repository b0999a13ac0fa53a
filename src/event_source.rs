use anyhow::Result;
use std::time::Duration;

use crate::fetch::FetchError;
use crate::files::{FileReadError, SelectedFile};

/// Everything that can happen to the page after setup: user interactions
/// plus the completions of the asynchronous operations they trigger.
///
/// Completions carry no sequence token. Two overlapping fetches or reads
/// resolve in whatever order they arrive, and the later one owns the
/// shared container.
#[derive(Debug, Clone)]
pub enum UiEvent {
    DragEnter,
    DragOver,
    DragLeave,
    Drop {
        files: Vec<SelectedFile>,
    },
    /// The file input's selection changed, via picker or drop.
    FileInputChange,
    /// Click on the navigation link at `index`, in document order.
    NavClick {
        index: usize,
    },
    PageFetched {
        url: String,
        result: Result<String, FetchError>,
    },
    FileRead {
        file_name: String,
        result: Result<String, FileReadError>,
    },
}

/// Trait for abstracting event delivery to enable testing.
pub trait EventSource {
    /// Poll for events with a timeout.
    fn poll(&mut self, timeout: Duration) -> Result<bool>;

    /// Read the next event.
    fn read(&mut self) -> Result<UiEvent>;
}

/// Replays a scripted event sequence for tests.
pub struct SimulatedEventSource {
    pub(crate) events: Vec<UiEvent>,
    current_index: usize,
}

impl SimulatedEventSource {
    pub fn new(events: Vec<UiEvent>) -> Self {
        Self {
            events,
            current_index: 0,
        }
    }
}

impl EventSource for SimulatedEventSource {
    fn poll(&mut self, _timeout: Duration) -> Result<bool> {
        Ok(self.current_index < self.events.len())
    }

    fn read(&mut self) -> Result<UiEvent> {
        if self.current_index < self.events.len() {
            let event = self.events[self.current_index].clone();
            self.current_index += 1;
            Ok(event)
        } else {
            anyhow::bail!("event script exhausted")
        }
    }
}

/// Event source backed by the channel the fetcher and file reader report
/// into. The binary's interactive loop drains it alongside user commands.
pub struct ChannelEventSource {
    receiver: flume::Receiver<UiEvent>,
    pending: Option<UiEvent>,
}

impl ChannelEventSource {
    pub fn new(receiver: flume::Receiver<UiEvent>) -> Self {
        Self {
            receiver,
            pending: None,
        }
    }
}

impl EventSource for ChannelEventSource {
    fn poll(&mut self, timeout: Duration) -> Result<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => {
                self.pending = Some(event);
                Ok(true)
            }
            Err(flume::RecvTimeoutError::Timeout) => Ok(false),
            Err(flume::RecvTimeoutError::Disconnected) => Ok(false),
        }
    }

    fn read(&mut self) -> Result<UiEvent> {
        if let Some(event) = self.pending.take() {
            return Ok(event);
        }
        Ok(self.receiver.recv()?)
    }
}
