use log::{debug, warn};
use std::time::Duration;
use thiserror::Error;
use ureq::Agent;

use crate::event_source::UiEvent;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct FetchError(pub String);

/// Issues a GET for a navigation link's target. Implementations deliver
/// the outcome as a [`UiEvent::PageFetched`]; requests are never cancelled
/// and completions apply in arrival order, so overlapping fetches for the
/// same frame resolve last-writer-wins.
pub trait PageFetcher {
    fn fetch(&self, url: &str);
}

/// HTTP fetcher running each request on its own worker thread.
pub struct HttpFetcher {
    agent: Agent,
    events: flume::Sender<UiEvent>,
}

impl HttpFetcher {
    pub fn new(events: flume::Sender<UiEvent>, timeout: Duration) -> Self {
        // The frame shows whatever body comes back; an error status must
        // not turn into a transport error.
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent, events }
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) {
        let agent = self.agent.clone();
        let events = self.events.clone();
        let url = url.to_string();
        std::thread::spawn(move || {
            let result = fetch_text(&agent, &url);
            match &result {
                Ok(body) => debug!("Fetched {} ({} bytes)", url, body.len()),
                Err(e) => warn!("Fetch of {} failed: {}", url, e),
            }
            let _ = events.send(UiEvent::PageFetched { url, result });
        });
    }
}

fn fetch_text(agent: &Agent, url: &str) -> Result<String, FetchError> {
    let mut response = agent
        .get(url)
        .call()
        .map_err(|e| FetchError(e.to_string()))?;
    response
        .body_mut()
        .read_to_string()
        .map_err(|e| FetchError(e.to_string()))
}
