//! Quote-of-the-moment panel.
//!
//! The panel asks a text-generation collaborator for a short calm line and
//! never surfaces its failures: an empty answer and an error each map to a
//! fixed fallback phrase.

mod gemini;

pub use gemini::GeminiQuoteSource;

use std::cell::{Cell, RefCell};
use std::future::Future;

use crate::error::QuoteError;

pub const QUOTE_PROMPT: &str = "Generate a short, wise, calm, and space-themed inspirational quote for a student or worker focusing on a task. Maximum 25 words. Do not include the author name or quotation marks.";
pub const QUOTE_TEMPERATURE: f64 = 0.7;

/// Shown when the collaborator answers with nothing.
pub const EMPTY_FALLBACK: &str = "The universe favors the focused mind.";
/// Shown when the collaborator fails.
pub const ERROR_FALLBACK: &str = "Stars do not rush, yet they shine.";

/// A text-generation service.
pub trait QuoteSource {
    fn generate(
        &self,
        prompt: &str,
        temperature: f64,
    ) -> impl Future<Output = Result<String, QuoteError>> + Send;
}

/// Ask `source` for a quote. Always yields displayable text.
pub async fn fetch_quote<Q: QuoteSource>(source: &Q, temperature: f64) -> String {
    match source.generate(QUOTE_PROMPT, temperature).await {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                tracing::warn!("quote service returned no text");
                EMPTY_FALLBACK.to_string()
            } else {
                text.to_string()
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch quote");
            ERROR_FALLBACK.to_string()
        }
    }
}

/// Panel state: the current quote and whether a request is outstanding.
///
/// `refresh` takes `&self` so a trigger can arrive while a request is in
/// flight; such a trigger is refused rather than queued.
pub struct QuotePanel<Q: QuoteSource> {
    source: Q,
    temperature: f64,
    quote: RefCell<String>,
    loading: Cell<bool>,
}

struct LoadingGuard<'a>(&'a Cell<bool>);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<Q: QuoteSource> QuotePanel<Q> {
    pub fn new(source: Q) -> Self {
        Self::with_temperature(source, QUOTE_TEMPERATURE)
    }

    pub fn with_temperature(source: Q, temperature: f64) -> Self {
        Self {
            source,
            temperature,
            quote: RefCell::new(String::new()),
            loading: Cell::new(false),
        }
    }

    /// Build the panel and run its initial fetch.
    pub async fn mount(source: Q, temperature: f64) -> Self {
        let panel = Self::with_temperature(source, temperature);
        panel.refresh().await;
        panel
    }

    pub fn quote(&self) -> String {
        self.quote.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    /// Whether the "New Signal" trigger is enabled.
    pub fn can_refresh(&self) -> bool {
        !self.loading.get()
    }

    /// Fetch a new quote. Returns `None` without fetching if one is already
    /// in flight.
    pub async fn refresh(&self) -> Option<String> {
        if self.loading.replace(true) {
            tracing::debug!("quote request already in flight");
            return None;
        }
        let _guard = LoadingGuard(&self.loading);
        let text = fetch_quote(&self.source, self.temperature).await;
        *self.quote.borrow_mut() = text.clone();
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Fixed(&'static str);

    impl QuoteSource for Fixed {
        async fn generate(&self, _prompt: &str, _temperature: f64) -> Result<String, QuoteError> {
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    impl QuoteSource for Failing {
        async fn generate(&self, _prompt: &str, _temperature: f64) -> Result<String, QuoteError> {
            Err(QuoteError::Other("collaborator exploded".into()))
        }
    }

    #[derive(Default)]
    struct Slow {
        calls: AtomicUsize,
    }

    impl QuoteSource for Slow {
        async fn generate(&self, prompt: &str, temperature: f64) -> Result<String, QuoteError> {
            assert_eq!(prompt, QUOTE_PROMPT);
            assert_eq!(temperature, QUOTE_TEMPERATURE);
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok("Orbit patiently.".into())
        }
    }

    #[tokio::test]
    async fn trims_successful_text() {
        assert_eq!(
            fetch_quote(&Fixed("  Drift with purpose.\n"), QUOTE_TEMPERATURE).await,
            "Drift with purpose."
        );
    }

    #[tokio::test]
    async fn empty_text_uses_calm_fallback() {
        assert_eq!(fetch_quote(&Fixed("   "), QUOTE_TEMPERATURE).await, EMPTY_FALLBACK);
    }

    #[tokio::test]
    async fn failure_uses_error_fallback() {
        let panel = QuotePanel::mount(Failing, QUOTE_TEMPERATURE).await;
        assert_eq!(panel.quote(), "Stars do not rush, yet they shine.");
        assert!(!panel.is_loading());
        assert_eq!(panel.refresh().await.as_deref(), Some(ERROR_FALLBACK));
    }

    #[tokio::test]
    async fn mount_fetches_once() {
        let panel = QuotePanel::mount(Fixed("Shine."), QUOTE_TEMPERATURE).await;
        assert_eq!(panel.quote(), "Shine.");
        assert!(panel.can_refresh());
    }

    #[tokio::test(start_paused = true)]
    async fn second_trigger_while_loading_is_refused() {
        let panel = QuotePanel::new(Slow::default());
        let (first, second) = tokio::join!(panel.refresh(), async {
            tokio::task::yield_now().await;
            assert!(panel.is_loading());
            assert!(!panel.can_refresh());
            panel.refresh().await
        });
        assert_eq!(first.as_deref(), Some("Orbit patiently."));
        assert!(second.is_none());
        assert_eq!(panel.source.calls.load(Ordering::SeqCst), 1);
        assert!(!panel.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_an_inflight_refresh_clears_loading() {
        let panel = QuotePanel::new(Slow::default());
        let timed_out = tokio::time::timeout(Duration::from_millis(10), panel.refresh()).await;
        assert!(timed_out.is_err());
        assert!(!panel.is_loading());
        assert_eq!(panel.quote(), "");
    }
}
