use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::effect::{BoxFuture, EffectError};

type Fetch = Arc<dyn Fn(i64) -> BoxFuture<Result<String, EffectError>> + Send + Sync>;

/// Source of number facts, injected into [`super::CounterReducer`].
#[derive(Clone)]
pub struct FactClient {
    fetch: Fetch,
}

impl FactClient {
    pub fn new<F, Fut>(fetch: F) -> Self
    where
        F: Fn(i64) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, EffectError>> + Send + 'static,
    {
        Self {
            fetch: Arc::new(move |number| -> BoxFuture<Result<String, EffectError>> {
                Box::pin(fetch(number))
            }),
        }
    }

    /// Offline client answering from a fixed template.
    pub fn canned() -> Self {
        Self::new(|number| async move { Ok(format!("{number} is a good number.")) })
    }

    /// Client that always fails with `message`.
    pub fn failing(message: &'static str) -> Self {
        Self::new(move |_| async move { Err(anyhow::anyhow!(message)) })
    }

    pub async fn fetch(&self, number: i64) -> Result<String, EffectError> {
        (self.fetch)(number).await
    }
}

impl Default for FactClient {
    fn default() -> Self {
        Self::canned()
    }
}

impl fmt::Debug for FactClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FactClient")
    }
}
