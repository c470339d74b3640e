use super::{ChatResult, Responder, timer};
use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;
use time::OffsetDateTime;

pub const MIN_DELAY_MS: u64 = 1000;
pub const MAX_DELAY_MS: u64 = 3000;

const REPLY_TEMPLATES: [(&str, &str); 5] = [
    ("I understand you mentioned \"", "\". Let me analyze that for you..."),
    ("About \"", "\", my suggestion is..."),
    ("What an interesting question! Regarding \"", "\", I think..."),
    ("Thanks for asking. For \"", "\", I can explain it like this..."),
    ("That's a great point. On \"", "\", I'd like to add..."),
];

pub const REPLY_TEMPLATE_COUNT: usize = REPLY_TEMPLATES.len();

/// Renders template `index` around the user's text, wrapping out of range indices.
pub fn render_reply(index: usize, text: &str) -> String {
    let (prefix, suffix) = REPLY_TEMPLATES[index % REPLY_TEMPLATE_COUNT];
    format!("{prefix}{text}{suffix}")
}

/// Source of the mock's choices.
pub trait ReplyStrategy: Send + Sync {
    /// Index in `0..count`.
    fn pick_template(&self, count: usize) -> usize;

    fn delay(&self) -> Duration;
}

/// Uniform template choice and a uniform delay in `[MIN_DELAY_MS, MAX_DELAY_MS)`.
pub struct RandomStrategy {
    rng: Mutex<SmallRng>,
}

impl RandomStrategy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    pub fn from_clock() -> Self {
        Self::new(OffsetDateTime::now_utc().unix_timestamp_nanos() as u64)
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut SmallRng) -> T) -> T {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }
}

impl ReplyStrategy for RandomStrategy {
    fn pick_template(&self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        self.with_rng(|rng| rng.random_range(0..count))
    }

    fn delay(&self) -> Duration {
        Duration::from_millis(self.with_rng(|rng| rng.random_range(MIN_DELAY_MS..MAX_DELAY_MS)))
    }
}

/// Stand-in for a real completion backend.
pub struct MockResponder<S = RandomStrategy> {
    strategy: S,
}

impl<S: ReplyStrategy> MockResponder<S> {
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }

    pub async fn generate(&self, text: &str) -> String {
        let reply = render_reply(self.strategy.pick_template(REPLY_TEMPLATE_COUNT), text);
        let delay = self.strategy.delay();
        tracing::debug!(delay_ms = delay.as_millis() as u64, "simulating reply latency");
        timer::sleep(delay).await;
        reply
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl<S: ReplyStrategy> Responder for MockResponder<S> {
    async fn reply(&self, text: &str) -> ChatResult<String> {
        Ok(self.generate(text).await)
    }
}
