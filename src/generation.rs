//! One-shot generation requests.
//!
//! Every request gets an id and a cancellation token. Starting a request of
//! a kind that is already running cancels the older one, and results that
//! arrive for a superseded id are discarded.

use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::ollama::OllamaClient;
use crate::prompts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Suggest,
    Rephrase,
    AutoWrite,
}

impl RequestKind {
    pub fn label(&self) -> &'static str {
        match self {
            RequestKind::Suggest => "suggestion",
            RequestKind::Rephrase => "rephrase",
            RequestKind::AutoWrite => "auto write",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: u64,
    pub kind: RequestKind,
    pub token: CancellationToken,
}

#[derive(Debug, Default)]
pub struct Tracker {
    next_id: u64,
    active: HashMap<RequestKind, Ticket>,
}

impl Tracker {
    pub fn begin(&mut self, kind: RequestKind) -> Ticket {
        self.next_id += 1;
        let ticket = Ticket {
            id: self.next_id,
            kind,
            token: CancellationToken::new(),
        };
        if let Some(previous) = self.active.insert(kind, ticket.clone()) {
            debug!(kind = kind.label(), id = previous.id, "superseded");
            previous.token.cancel();
        }
        ticket
    }

    /// Mark `id` finished. Returns false if it was superseded or cancelled,
    /// in which case its result should be ignored.
    pub fn finish(&mut self, kind: RequestKind, id: u64) -> bool {
        match self.active.get(&kind) {
            Some(ticket) if ticket.id == id => {
                self.active.remove(&kind);
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self, kind: RequestKind) {
        if let Some(ticket) = self.active.remove(&kind) {
            ticket.token.cancel();
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, ticket) in self.active.drain() {
            ticket.token.cancel();
        }
    }

    pub fn is_busy(&self, kind: RequestKind) -> bool {
        self.active.contains_key(&kind)
    }

    pub fn any_busy(&self) -> bool {
        !self.active.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Completed(Vec<String>),
    Cancelled,
    Failed(String),
}

/// Ask the model `count` times in parallel. Replies are cleaned, blanks and
/// duplicates dropped. Fails only if every call failed.
pub async fn run(
    client: Arc<OllamaClient>,
    prompt: String,
    count: usize,
    token: CancellationToken,
) -> Outcome {
    let calls = (0..count.max(1)).map(|_| client.generate(&prompt));

    let results = tokio::select! {
        biased;
        _ = token.cancelled() => return Outcome::Cancelled,
        results = join_all(calls) => results,
    };

    collect(results)
}

fn collect(results: Vec<anyhow::Result<String>>) -> Outcome {
    let mut replies: Vec<String> = Vec::new();
    let mut first_error = None;

    for result in results {
        match result {
            Ok(raw) => {
                let cleaned = prompts::clean_response(&raw);
                if !cleaned.is_empty() && !replies.contains(&cleaned) {
                    replies.push(cleaned);
                }
            }
            Err(e) => {
                warn!("generation failed: {:#}", e);
                first_error.get_or_insert_with(|| format!("{:#}", e));
            }
        }
    }

    match (replies.is_empty(), first_error) {
        (true, Some(error)) => Outcome::Failed(error),
        _ => Outcome::Completed(replies),
    }
}
