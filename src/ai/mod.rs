/// Reply generation for the chat view
///
/// The view only ever talks to a [`Responder`]: text in, text out, possibly
/// failing. Which responder backs it is decided once at startup.
///
/// # Architecture
///
/// - `mock` - Canned replies after a simulated network delay (the default)
/// - `remote` - Replies fetched through a deployed completion proxy
/// - `timer` - Platform sleep used by the mock
///
/// # Usage
///
/// ```rust,no_run
/// use banter::ai::{MockResponder, RandomStrategy, Responder};
///
/// # async fn example() -> banter::ai::ChatResult<()> {
/// let responder = MockResponder::new(RandomStrategy::from_clock());
/// let reply = responder.reply("Hello!").await?;
/// # Ok(())
/// # }
/// ```
mod mock;
mod remote;
mod timer;

use async_trait::async_trait;
use std::sync::Arc;

pub use mock::{
    MAX_DELAY_MS, MIN_DELAY_MS, MockResponder, REPLY_TEMPLATE_COUNT, RandomStrategy,
    ReplyStrategy, render_reply,
};
pub use remote::ProxyResponder;
pub use timer::sleep;

/// Environment variable naming a deployed completion proxy.
pub const PROXY_URL_VAR: &str = "BANTER_PROXY_URL";

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream error {status}: {body}")]
    Upstream { status: u16, body: String },

    /// No reply could be produced. Not raised by the bundled responders;
    /// available to other `Responder` implementations and test doubles.
    #[error("{0}")]
    Unavailable(String),
}

pub type ChatResult<T> = Result<T, ChatError>;

/// Produces the assistant's reply to a single user utterance.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Responder {
    async fn reply(&self, text: &str) -> ChatResult<String>;
}

pub type SharedResponder = Arc<dyn Responder>;

/// Picks the responder for this process.
///
/// `BANTER_PROXY_URL` (runtime env, or baked in at compile time for browser
/// builds) selects [`ProxyResponder`]; otherwise replies come from the mock.
pub fn responder_from_env() -> SharedResponder {
    let proxy_url = std::env::var(PROXY_URL_VAR)
        .ok()
        .or_else(|| option_env!("BANTER_PROXY_URL").map(str::to_string))
        .filter(|url| !url.trim().is_empty());

    match proxy_url {
        Some(url) => {
            tracing::info!(%url, "replies routed through completion proxy");
            Arc::new(ProxyResponder::new(url))
        }
        None => {
            tracing::info!("replies generated by mock responder");
            Arc::new(MockResponder::new(RandomStrategy::from_clock()))
        }
    }
}
