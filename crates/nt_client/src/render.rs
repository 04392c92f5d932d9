use std::fmt::Write;
use chrono::DateTime;
use nt_core::{Article, RewriteState};
use crate::controller::FetchState;
use crate::rewrites::RewriteStates;

pub const LOADING: &str = "Loading news...";
pub const EMPTY: &str = "No news found.";

fn display_date(published_at: &str) -> String {
    DateTime::parse_from_rfc3339(published_at)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| published_at.to_string())
}

fn render_article(out: &mut String, article: &Article, state: &RewriteState) {
    let _ = writeln!(out, "{}", article.title);
    let _ = writeln!(out, "{} • {}", article.source, display_date(&article.published_at));
    let _ = writeln!(out, "{}", article.summary);
    let _ = writeln!(out, "Read more: {}", article.url);
    match state {
        RewriteState::Idle => {}
        RewriteState::Pending => {
            let _ = writeln!(out, "⏳ Neutralizing...");
        }
        RewriteState::Succeeded(text) => {
            let _ = writeln!(out, "⚖️  Neutral: {}", text);
        }
        RewriteState::Failed(msg) => {
            let _ = writeln!(out, "⚠️  {}", msg);
        }
    }
}

/// Text view of the headline page.
pub fn render(fetch: &FetchState, rewrites: &RewriteStates) -> String {
    match fetch {
        FetchState::Loading => format!("{}\n", LOADING),
        FetchState::Errored(msg) => format!("{}\n", msg),
        FetchState::Loaded(articles) if articles.is_empty() => format!("{}\n", EMPTY),
        FetchState::Loaded(articles) => {
            let mut out = String::new();
            for (i, article) in articles.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                render_article(&mut out, article, rewrites.get(article.id));
            }
            out
        }
    }
}
