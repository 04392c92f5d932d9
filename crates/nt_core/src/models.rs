use async_trait::async_trait;
use std::fmt;
use crate::Result;

/// Instruction wrapped around every text sent for neutralization.
pub const NEUTRAL_PROMPT: &str =
    "Rewrite the following news article to be as neutral and unbiased as possible:";

pub fn neutral_prompt(text: &str) -> String {
    format!("{}\n\n{}", NEUTRAL_PROMPT, text)
}

#[async_trait]
pub trait InferenceModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Fails with [`crate::Error::Configuration`] when the model cannot be
    /// called at all. Must not touch the network.
    fn ensure_configured(&self) -> Result<()> {
        Ok(())
    }

    /// Rewrite `text` into a neutral, unbiased version with a single
    /// synchronous completion.
    async fn neutralize(&self, text: &str) -> Result<String>;
}
