use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nt_client::error::Result;
use nt_client::{ClientError, Controller, FetchState, NewsBackend, Reply, StalePolicy};
use nt_core::{ArticleId, RewriteState};
use serde_json::{json, Value};

#[derive(Default)]
struct ScriptedBackend {
    headlines: Mutex<VecDeque<Result<Reply>>>,
    rewrites: Mutex<VecDeque<(Duration, Result<Reply>)>>,
    requested: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn with_headlines(self, reply: Result<Reply>) -> Self {
        self.headlines.lock().unwrap().push_back(reply);
        self
    }

    fn with_rewrite(self, delay_ms: u64, reply: Result<Reply>) -> Self {
        self.rewrites
            .lock()
            .unwrap()
            .push_back((Duration::from_millis(delay_ms), reply));
        self
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl NewsBackend for ScriptedBackend {
    async fn fetch_headlines(&self) -> Result<Reply> {
        self.headlines
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted headline reply")
    }

    async fn request_rewrite(&self, text: &str) -> Result<Reply> {
        self.requested.lock().unwrap().push(text.to_string());
        let (delay, reply) = self
            .rewrites
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted rewrite reply");
        tokio::time::sleep(delay).await;
        reply
    }
}

fn transport_failure() -> ClientError {
    serde_json::from_str::<Value>("<html>").unwrap_err().into()
}

fn one_article() -> Result<Reply> {
    Ok(Reply::new(
        200,
        json!({ "articles": [{ "title": "A", "source": { "name": "X" }, "description": "d", "url": "http://u" }] }),
    ))
}

fn neutral(text: &str) -> Result<Reply> {
    Ok(Reply::new(200, json!({ "neutralSummary": text })))
}

#[tokio::test]
async fn load_maps_articles_with_defaults() {
    let backend = Arc::new(ScriptedBackend::default().with_headlines(one_article()));
    let mut controller = Controller::new(backend);
    assert_eq!(controller.fetch_state(), &FetchState::Loading);

    let before = Utc::now();
    controller.load().await;
    let after = Utc::now();

    let articles = controller.articles();
    assert_eq!(articles.len(), 1);
    let article = &articles[0];
    assert_eq!(article.id, ArticleId(0));
    assert_eq!(article.title, "A");
    assert_eq!(article.source, "X");
    assert_eq!(article.summary, "d");
    assert_eq!(article.image_url, "/globe.svg");
    assert_eq!(article.url, "http://u");

    let published: DateTime<Utc> = DateTime::parse_from_rfc3339(&article.published_at)
        .expect("rfc3339 fetch time")
        .with_timezone(&Utc);
    assert!(published >= before - chrono::Duration::milliseconds(1));
    assert!(published <= after);
}

#[tokio::test]
async fn load_failures_become_messages() {
    let backend = Arc::new(
        ScriptedBackend::default()
            .with_headlines(Ok(Reply::new(500, json!({ "error": "Missing NewsAPI key" }))))
            .with_headlines(Err(transport_failure())),
    );
    let mut controller = Controller::new(backend);

    assert_eq!(controller.load().await, &FetchState::Errored("Missing NewsAPI key".into()));
    assert_eq!(controller.load().await, &FetchState::Errored("Failed to load news".into()));
    assert!(controller.render().starts_with("Failed to load news"));
}

#[tokio::test]
async fn repeated_loads_are_structurally_identical() {
    let payload = json!({ "articles": [
        { "title": "A", "source": { "name": "X" }, "publishedAt": "2025-05-17T09:30:00Z", "description": "d" },
        { "title": "B", "source": null, "publishedAt": "2025-05-17T10:00:00Z", "url": null }
    ] });
    let backend = Arc::new(
        ScriptedBackend::default()
            .with_headlines(Ok(Reply::new(200, payload.clone())))
            .with_headlines(Ok(Reply::new(200, payload))),
    );
    let mut controller = Controller::new(backend);

    let first = controller.load().await.clone();
    let second = controller.load().await.clone();
    assert_eq!(first, second);
    assert_eq!(first.articles()[1].source, "Unknown");
    assert_eq!(first.articles()[1].url, "#");
}

#[tokio::test]
async fn rewrite_sends_summary_and_tracks_success() {
    let backend = Arc::new(
        ScriptedBackend::default()
            .with_headlines(one_article())
            .with_rewrite(0, neutral("a neutral d")),
    );
    let mut controller = Controller::new(backend.clone());
    controller.load().await;

    let state = controller.rewrite(ArticleId(0)).await.cloned();
    assert_eq!(state, Some(RewriteState::Succeeded("a neutral d".into())));
    assert_eq!(backend.requested(), vec!["d".to_string()]);
    assert!(controller.render().contains("Neutral: a neutral d"));

    assert!(controller.rewrite(ArticleId(5)).await.is_none());
}

#[tokio::test]
async fn rewrite_failure_reports_provider_message() {
    let backend = Arc::new(
        ScriptedBackend::default()
            .with_headlines(one_article())
            .with_rewrite(0, Ok(Reply::new(500, json!({ "error": "rate limited" }))))
            .with_rewrite(0, Err(transport_failure())),
    );
    let mut controller = Controller::new(backend);
    controller.load().await;

    let state = controller.rewrite(ArticleId(0)).await.cloned();
    assert_eq!(state, Some(RewriteState::Failed("rate limited".into())));

    let state = controller.rewrite(ArticleId(0)).await.cloned();
    assert_eq!(
        state,
        Some(RewriteState::Failed("Failed to generate neutral summary".into()))
    );
}

#[tokio::test]
async fn racing_rewrites_last_completed_wins() {
    let backend = Arc::new(
        ScriptedBackend::default()
            .with_headlines(one_article())
            .with_rewrite(80, neutral("A"))
            .with_rewrite(0, neutral("B")),
    );
    let mut controller = Controller::new(backend);
    controller.load().await;

    let applied = controller.rewrite_many([ArticleId(0), ArticleId(0)]).await;
    assert_eq!(applied, 2);
    assert_eq!(controller.rewrite_state(ArticleId(0)), &RewriteState::Succeeded("A".into()));
}

#[tokio::test]
async fn racing_rewrites_drop_stale_keeps_latest_request() {
    let backend = Arc::new(
        ScriptedBackend::default()
            .with_headlines(one_article())
            .with_rewrite(80, neutral("A"))
            .with_rewrite(0, neutral("B")),
    );
    let mut controller = Controller::new(backend.clone()).with_policy(StalePolicy::DropStale);
    controller.load().await;

    let first = controller.begin_rewrite(ArticleId(0)).unwrap();
    let second = controller.begin_rewrite(ArticleId(0)).unwrap();
    let (a, b) = tokio::join!(
        backend.request_rewrite(&first.text),
        backend.request_rewrite(&second.text)
    );

    assert!(controller.complete_rewrite(second, b));
    assert!(!controller.complete_rewrite(first, a));
    assert_eq!(controller.rewrite_state(ArticleId(0)), &RewriteState::Succeeded("B".into()));
}

#[tokio::test]
async fn reload_discards_rewrite_states() {
    let backend = Arc::new(
        ScriptedBackend::default()
            .with_headlines(one_article())
            .with_headlines(one_article())
            .with_rewrite(0, neutral("n")),
    );
    let mut controller = Controller::new(backend);
    controller.load().await;
    controller.rewrite_all().await;
    assert!(controller.rewrite_state(ArticleId(0)).is_terminal());

    controller.load().await;
    assert!(controller.rewrites().is_empty());
    assert_eq!(controller.rewrite_state(ArticleId(0)), &RewriteState::Idle);
}
