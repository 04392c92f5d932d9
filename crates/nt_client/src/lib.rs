pub mod backend;
pub mod controller;
pub mod error;
pub mod render;
pub mod rewrites;
pub mod voice;

pub use backend::{HttpBackend, NewsBackend, Reply};
pub use controller::{Controller, FetchState};
pub use error::ClientError;
pub use rewrites::{RewriteStates, RewriteTicket, StalePolicy};

pub mod prelude {
    pub use super::{Controller, FetchState, HttpBackend, NewsBackend, StalePolicy};
    pub use nt_core::{Article, ArticleId, RewriteState};
}
