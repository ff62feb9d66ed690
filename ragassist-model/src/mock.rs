//! Scripted language model for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{ModelError, Result};
use crate::llm::Llm;

/// A language model that answers with a fixed reply and records every prompt.
///
/// ```rust
/// # tokio_test::block_on(async {
/// use ragassist_model::{Llm, MockLlm};
///
/// let llm = MockLlm::new("It is blue.");
/// assert_eq!(llm.complete("What colour is the sky?").await.unwrap(), "It is blue.");
/// assert_eq!(llm.prompts(), vec!["What colour is the sky?".to_string()]);
/// # });
/// ```
#[derive(Debug)]
pub struct MockLlm {
    reply: std::result::Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    /// Always answer `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: Ok(reply.into()), prompts: Mutex::new(Vec::new()) }
    }

    /// Always fail with a request error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { reply: Err(message.into()), prompts: Mutex::new(Vec::new()) }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn provider(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "mock-llm"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.reply
            .clone()
            .map_err(|message| ModelError::Request { provider: "mock".into(), message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failing_mock_still_records_the_prompt() {
        let llm = MockLlm::failing("backend down");
        let err = llm.complete("hello").await.unwrap_err();
        assert!(err.to_string().contains("backend down"));
        assert_eq!(llm.prompts(), vec!["hello".to_string()]);
    }
}
