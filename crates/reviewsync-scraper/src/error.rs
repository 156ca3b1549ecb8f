use thiserror::Error;

/// A failure talking to the page renderer. Always recoverable from the
/// harvest's point of view: callers degrade the current step and move on.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("browser protocol error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("page script threw: {0}")]
    Script(String),

    #[error("unexpected script result: {0}")]
    UnexpectedValue(String),

    #[error("script argument encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("browser process error: {0}")]
    Io(#[from] std::io::Error),

    #[error("renderer session already closed")]
    Closed,
}

/// Fatal harvest errors. Everything else inside a harvest degrades to an
/// empty or default value and is logged.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: RenderError,
    },

    #[error("invalid source URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
