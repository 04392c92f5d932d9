pub mod newsapi;

pub use newsapi::NewsApiClient;

pub mod prelude {
    pub use super::newsapi::NewsApiClient;
    pub use nt_core::{HeadlineProvider, NewsApiConfig, Result, Error};
}
