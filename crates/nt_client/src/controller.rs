use std::collections::HashMap;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::Value;
use tracing::{debug, info, warn};
use nt_core::{Article, ArticleId, ProviderArticle, RewriteState};
use crate::backend::{NewsBackend, Reply};
use crate::error::Result;
use crate::render;
use crate::rewrites::{RewriteStates, RewriteTicket, StalePolicy};

pub const LOAD_FAILED: &str = "Failed to load news";
pub const REWRITE_FAILED: &str = "Failed to generate neutral summary";

/// Page-level state of the headline list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    Loading,
    Loaded(Vec<Article>),
    Errored(String),
}

impl FetchState {
    /// Interpret a headline reply. Only the body shape matters: an
    /// `articles` array loads, anything else is an error. Each record is
    /// read leniently so one misshapen entry only loses its own fields.
    pub fn from_reply(outcome: Result<Reply>, fetched_at: DateTime<Utc>) -> Self {
        let reply = match outcome {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Headline request failed: {}", e);
                return FetchState::Errored(LOAD_FAILED.to_string());
            }
        };

        match reply.body.get("articles").and_then(Value::as_array) {
            Some(raw) => {
                let raw: Vec<ProviderArticle> = raw.iter().map(ProviderArticle::from_value).collect();
                FetchState::Loaded(Article::from_provider_list(&raw, fetched_at))
            }
            None => FetchState::Errored(reply.text_field("error").unwrap_or(LOAD_FAILED).to_string()),
        }
    }

    pub fn articles(&self) -> &[Article] {
        match self {
            FetchState::Loaded(articles) => articles,
            _ => &[],
        }
    }
}

/// Interpret a rewrite reply. Exactly one of success, reported failure or
/// transport failure applies.
pub fn rewrite_state_from(outcome: Result<Reply>) -> RewriteState {
    match outcome {
        Ok(reply) => match reply.text_field("neutralSummary") {
            Some(summary) if reply.is_success() => RewriteState::Succeeded(summary.to_string()),
            _ => RewriteState::Failed(reply.text_field("error").unwrap_or(REWRITE_FAILED).to_string()),
        },
        Err(e) => {
            warn!("Rewrite request failed: {}", e);
            RewriteState::Failed(REWRITE_FAILED.to_string())
        }
    }
}

/// Drives the headline page: one fetch per load plus independent per-article
/// rewrites.
///
/// Rewrites for the same article are never coalesced or cancelled. With
/// [`StalePolicy::LastWriteWins`] the completion applied last decides the
/// article's state; with [`StalePolicy::DropStale`] completions of superseded
/// requests are ignored. Completions that belong to an earlier load are always
/// ignored since their article is gone.
pub struct Controller {
    backend: Arc<dyn NewsBackend>,
    fetch: FetchState,
    rewrites: RewriteStates,
    sequences: HashMap<ArticleId, u64>,
    generation: u64,
    policy: StalePolicy,
}

impl Controller {
    pub fn new(backend: Arc<dyn NewsBackend>) -> Self {
        Self {
            backend,
            fetch: FetchState::Loading,
            rewrites: RewriteStates::new(),
            sequences: HashMap::new(),
            generation: 0,
            policy: StalePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: StalePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> StalePolicy {
        self.policy
    }

    pub fn fetch_state(&self) -> &FetchState {
        &self.fetch
    }

    pub fn articles(&self) -> &[Article] {
        self.fetch.articles()
    }

    pub fn rewrites(&self) -> &RewriteStates {
        &self.rewrites
    }

    pub fn rewrite_state(&self, id: ArticleId) -> &RewriteState {
        self.rewrites.get(id)
    }

    /// Fetch the headlines once, replacing the article list and discarding
    /// every rewrite state from the previous load.
    pub async fn load(&mut self) -> &FetchState {
        self.generation += 1;
        self.rewrites.clear();
        self.sequences.clear();
        self.fetch = FetchState::Loading;

        let outcome = self.backend.fetch_headlines().await;
        self.fetch = FetchState::from_reply(outcome, Utc::now());
        match &self.fetch {
            FetchState::Loaded(articles) => info!("📰 Loaded {} articles", articles.len()),
            FetchState::Errored(msg) => warn!("Could not load news: {}", msg),
            FetchState::Loading => {}
        }
        &self.fetch
    }

    /// Mark `id` pending and issue a ticket for the request. Returns `None`
    /// when no such article is displayed.
    pub fn begin_rewrite(&mut self, id: ArticleId) -> Option<RewriteTicket> {
        let text = self.articles().iter().find(|a| a.id == id)?.summary.clone();

        let seq = self.sequences.entry(id).or_insert(0);
        *seq += 1;
        let seq = *seq;

        self.rewrites.set(id, RewriteState::Pending);
        debug!("Rewrite #{} issued for article {}", seq, id);
        Some(RewriteTicket {
            id,
            text,
            seq,
            generation: self.generation,
        })
    }

    /// Apply the outcome of a ticket's request. Returns whether it changed
    /// the article's state.
    pub fn complete_rewrite(&mut self, ticket: RewriteTicket, outcome: Result<Reply>) -> bool {
        if ticket.generation != self.generation {
            debug!("Dropping rewrite #{} for article {} from a previous load", ticket.seq, ticket.id);
            return false;
        }
        if self.policy == StalePolicy::DropStale
            && self.sequences.get(&ticket.id) != Some(&ticket.seq)
        {
            debug!("Dropping superseded rewrite #{} for article {}", ticket.seq, ticket.id);
            return false;
        }

        let state = rewrite_state_from(outcome);
        self.rewrites.set(ticket.id, state);
        true
    }

    /// Request a rewrite of one article and wait for it.
    pub async fn rewrite(&mut self, id: ArticleId) -> Option<&RewriteState> {
        let ticket = self.begin_rewrite(id)?;
        let outcome = self.backend.request_rewrite(&ticket.text).await;
        self.complete_rewrite(ticket, outcome);
        Some(self.rewrites.get(id))
    }

    /// Request rewrites for all `ids` at once and apply each result as it
    /// arrives. Unknown ids are skipped. Returns how many results were applied.
    pub async fn rewrite_many<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = ArticleId>,
    {
        let tickets: Vec<_> = ids
            .into_iter()
            .filter_map(|id| self.begin_rewrite(id))
            .collect();
        debug!(
            "{} rewrites in flight across {} pending articles",
            tickets.len(),
            self.rewrites.pending()
        );

        let mut in_flight: FuturesUnordered<_> = tickets
            .into_iter()
            .map(|ticket| {
                let backend = Arc::clone(&self.backend);
                async move {
                    let outcome = backend.request_rewrite(&ticket.text).await;
                    (ticket, outcome)
                }
            })
            .collect();

        let mut applied = 0;
        while let Some((ticket, outcome)) = in_flight.next().await {
            if self.complete_rewrite(ticket, outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Rewrite every displayed article concurrently.
    pub async fn rewrite_all(&mut self) -> usize {
        let ids: Vec<_> = self.articles().iter().map(|a| a.id).collect();
        self.rewrite_many(ids).await
    }

    pub fn render(&self) -> String {
        render::render(&self.fetch, &self.rewrites)
    }
}
