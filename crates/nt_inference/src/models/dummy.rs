use std::fmt;
use nt_core::Result;
use super::InferenceModel;

const MAX_WORDS: usize = 40;

/// Offline stand-in that needs no credential: trims the text to its first
/// words and drops exclamation marks.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl InferenceModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn neutralize(&self, text: &str) -> Result<String> {
        let words: Vec<String> = text
            .split_whitespace()
            .take(MAX_WORDS)
            .map(|w| w.replace('!', ""))
            .filter(|w| !w.is_empty())
            .collect();
        Ok(words.join(" "))
    }
}
