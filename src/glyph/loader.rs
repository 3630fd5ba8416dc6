use std::sync::{Arc, mpsc};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Context;

use crate::foundation::error::TracerResult;
use crate::glyph::model::CharacterGlyph;
use crate::glyph::provider::GlyphProvider;

/// Identifies one glyph request.
///
/// `generation` is the practice session generation at request time; a result is only applied
/// while both fields still match the active session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct FetchTicket {
    /// Requested character.
    pub character: char,
    /// Session generation at request time.
    pub generation: u64,
}

/// A finished request.
#[derive(Clone, Debug)]
pub struct GlyphFetched {
    /// The request being answered.
    pub ticket: FetchTicket,
    /// The glyph, or `None` when the source has none.
    pub glyph: Option<Arc<CharacterGlyph>>,
    /// The provider errored; `glyph` is `None` but the character was not answered.
    pub failed: bool,
}

/// Background glyph fetcher.
///
/// Requests are answered in order on a single worker thread. Provider errors are logged and
/// answered with `None`; nothing is retried.
pub struct GlyphLoader {
    requests: Option<mpsc::Sender<FetchTicket>>,
    results: mpsc::Receiver<GlyphFetched>,
    worker: Option<JoinHandle<()>>,
}

impl GlyphLoader {
    /// Start the worker thread. Dropping the loader stops it.
    pub fn spawn(provider: Arc<dyn GlyphProvider>) -> TracerResult<Self> {
        let (req_tx, req_rx) = mpsc::channel::<FetchTicket>();
        let (res_tx, res_rx) = mpsc::channel::<GlyphFetched>();

        let worker = std::thread::Builder::new()
            .name("glyph-loader".to_string())
            .spawn(move || {
                for ticket in req_rx {
                    let (glyph, failed) = match provider.fetch(ticket.character) {
                        Ok(g) => (g.map(Arc::new), false),
                        Err(e) => {
                            tracing::warn!(character = %ticket.character, error = %e, "glyph fetch failed");
                            (None, true)
                        }
                    };
                    let done = GlyphFetched {
                        ticket,
                        glyph,
                        failed,
                    };
                    if res_tx.send(done).is_err() {
                        break;
                    }
                }
            })
            .context("spawn glyph loader thread")?;

        Ok(Self {
            requests: Some(req_tx),
            results: res_rx,
            worker: Some(worker),
        })
    }

    /// Queue a request. Returns `false` if the worker has gone away.
    pub fn request(&self, ticket: FetchTicket) -> bool {
        self.requests
            .as_ref()
            .is_some_and(|tx| tx.send(ticket).is_ok())
    }

    /// Next finished request, without blocking.
    pub fn try_recv(&self) -> Option<GlyphFetched> {
        self.results.try_recv().ok()
    }

    /// Next finished request, waiting at most `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<GlyphFetched> {
        self.results.recv_timeout(timeout).ok()
    }
}

impl Drop for GlyphLoader {
    fn drop(&mut self) {
        self.requests.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/glyph/loader.rs"]
mod tests;
