pub mod models;

pub use models::create_model;

pub const DEFAULT_MODEL: &str = "friendli";

pub mod prelude {
    pub use super::models::{create_model, DummyModel, FriendliModel};
    pub use nt_core::{InferenceConfig, InferenceModel, Result, Error};
}
