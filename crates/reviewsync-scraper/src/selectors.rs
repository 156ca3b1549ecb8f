//! Locator sets for the review profile page.
//!
//! The page markup is undocumented and shifts without notice, so every
//! logical target carries several candidates. Order is priority.

use crate::renderer::Locator;

/// Ordered candidate locators for one logical target.
#[derive(Debug, Clone, Copy)]
pub struct LocatorSet {
    pub name: &'static str,
    pub locators: &'static [Locator],
}

impl LocatorSet {
    #[must_use]
    pub const fn new(name: &'static str, locators: &'static [Locator]) -> Self {
        Self { name, locators }
    }
}

/// The scrollable list that holds the review cards.
pub const CONTAINER: LocatorSet = LocatorSet::new(
    "container",
    &[
        Locator::Css(r#"div[role="feed"]"#),
        Locator::Css(r#"div[role="main"]"#),
        Locator::Css("div.m6QErb.DxyBCb"),
        Locator::Css(r#"div[aria-label*="Reviews" i]"#),
    ],
);

pub const CARD: LocatorSet = LocatorSet::new(
    "card",
    &[
        Locator::Css("div.jftiEf"),
        Locator::Css("div[data-review-id]"),
    ],
);

/// Page heading naming the profile owner. Also the subject fallback.
pub const PROFILE_LABEL: LocatorSet = LocatorSet::new("profile_label", &[Locator::Css("h1")]);

pub const SUBJECT: LocatorSet = LocatorSet::new(
    "subject",
    &[
        Locator::Css("div.d4r55"),
        Locator::Css("button.fontHeadlineSmall"),
    ],
);

/// Star-rating element; the score is read from its `aria-label`.
pub const SCORE: LocatorSet = LocatorSet::new(
    "score",
    &[
        Locator::Css("span.kvMYJc"),
        Locator::Css(r#"span[role="img"][aria-label*="star"]"#),
    ],
);

pub const SCORE_ATTRIBUTE: &str = "aria-label";

/// Body rules. An empty text falls through to the next rule.
pub const BODY: LocatorSet = LocatorSet::new(
    "body",
    &[
        Locator::Css("span.wiI7pd"),
        Locator::Css("div.MyEned span"),
        Locator::XPath(".//span[normalize-space(text())]"),
    ],
);

/// Candidates for the comma-delimited place address on a card.
pub const LOCATION: LocatorSet = LocatorSet::new(
    "location",
    &[
        Locator::Css(r#"a[href*="/maps/place"]"#),
        Locator::Css("div.d4r55+div"),
        Locator::Css("div.W4Efsd"),
        Locator::Css("div.fontBodyMedium"),
    ],
);

/// "More" buttons on truncated review bodies.
pub const EXPAND_BUTTON: LocatorSet = LocatorSet::new(
    "expand_button",
    &[Locator::Css(r#"button.w8nwRe, button[jsaction*="expand"]"#)],
);
