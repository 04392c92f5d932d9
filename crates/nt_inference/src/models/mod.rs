use std::sync::Arc;
use nt_core::{Error, InferenceConfig, Result};

pub use nt_core::InferenceModel;

pub mod dummy;
pub mod friendli;

pub use dummy::DummyModel;
pub use friendli::FriendliModel;

/// Build the model named `name` (`friendli` or `dummy`). The credential is
/// not checked here; a missing token is reported on the first request.
pub fn create_model(name: &str, config: InferenceConfig) -> Result<Arc<dyn InferenceModel>> {
    match name.to_lowercase().as_str() {
        "friendli" => Ok(Arc::new(FriendliModel::new(config))),
        "dummy" => Ok(Arc::new(DummyModel::new())),
        other => Err(Error::Validation(format!(
            "Unknown model: {}. Available models: friendli, dummy",
            other
        ))),
    }
}
