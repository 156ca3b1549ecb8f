pub mod chromium;
pub mod enrich;
pub mod error;
pub mod expand;
pub mod extract;
pub mod harvest;
pub mod renderer;
pub mod resolve;
pub mod scroll;
pub mod selectors;
pub mod step;

#[cfg(test)]
pub(crate) mod testing;

pub use chromium::{BrowserSettings, ChromiumRenderer};
pub use enrich::enrich_records;
pub use error::{RenderError, ScraperError};
pub use expand::expand_reviews;
pub use extract::{extract_records, parse_score_label};
pub use harvest::{harvest_page, run_session, validate_source_url};
pub use renderer::{Locator, PageRenderer};
pub use resolve::{first_text, resolve, resolve_all};
pub use scroll::{scroll_until_stable, ScrollReport};
pub use selectors::LocatorSet;
pub use step::Step;
