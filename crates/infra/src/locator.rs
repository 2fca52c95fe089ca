//! Resource locators and the routing table that classifies them.
//!
//! A locator is `content://{authority}/{segment}/...`; the scheme is optional.
//! Classification is pure: it never looks at the store.

use core::convert::Infallible;
use core::str::FromStr;

use stockkeep_products::contract::{CONTENT_SCHEME, PATH_PRODUCTS};

/// A parsed hierarchical locator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    authority: String,
    segments: Vec<String>,
}

impl Locator {
    /// Parse `text`. Total: anything that is not a known shape simply fails
    /// to match later.
    ///
    /// The `content://` scheme, a query string or fragment, and empty path
    /// segments are dropped.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let text = text
            .strip_prefix(CONTENT_SCHEME)
            .and_then(|rest| rest.strip_prefix("://"))
            .unwrap_or(text);
        let text = text.split(['?', '#']).next().unwrap_or_default();

        let mut parts = text.split('/');
        let authority = parts.next().unwrap_or_default().to_string();
        let segments = parts
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            authority,
            segments,
        }
    }

    /// `content://{authority}/products`
    pub fn collection(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            segments: vec![PATH_PRODUCTS.to_string()],
        }
    }

    /// `content://{authority}/products/{token}`
    pub fn item(authority: impl Into<String>, token: impl Into<String>) -> Self {
        Self::collection(authority).with_appended(token)
    }

    /// This locator with one more path segment.
    pub fn with_appended(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// This locator with a store-assigned row id appended.
    pub fn with_appended_id(&self, id: i64) -> Self {
        self.clone().with_appended(id.to_string())
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Trailing segment, if any.
    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

impl core::fmt::Display for Locator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{CONTENT_SCHEME}://{}", self.authority)?;
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for Locator {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for Locator {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// What a locator addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatorMatch {
    /// The whole products collection.
    Collection,
    /// One record; carries the trailing path token.
    Item(String),
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Products,
    ProductItem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(&'static str),
    Token,
}

/// Immutable routing table, built once per gateway.
#[derive(Debug, Clone)]
pub struct LocatorMatcher {
    authority: String,
    routes: Vec<(Vec<Segment>, Route)>,
}

impl LocatorMatcher {
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            routes: vec![
                (vec![Segment::Literal(PATH_PRODUCTS)], Route::Products),
                (
                    vec![Segment::Literal(PATH_PRODUCTS), Segment::Token],
                    Route::ProductItem,
                ),
            ],
        }
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn classify(&self, locator: &Locator) -> LocatorMatch {
        if locator.authority() != self.authority {
            return LocatorMatch::Unrecognized;
        }

        let route = self.routes.iter().find(|(pattern, _)| {
            pattern.len() == locator.segments().len()
                && pattern
                    .iter()
                    .zip(locator.segments())
                    .all(|(p, s)| match p {
                        Segment::Literal(lit) => *lit == s.as_str(),
                        Segment::Token => !s.is_empty(),
                    })
        });

        match (route.map(|(_, r)| *r), locator.last_segment()) {
            (Some(Route::Products), _) => LocatorMatch::Collection,
            (Some(Route::ProductItem), Some(token)) => LocatorMatch::Item(token.to_string()),
            _ => LocatorMatch::Unrecognized,
        }
    }
}

/// Comparison argument for an item token.
///
/// An all-digit token is compared in its natural decimal form (`"007"` becomes
/// `"7"`); anything else is compared verbatim.
pub fn item_argument(token: &str) -> String {
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = token.parse::<u64>() {
            return n.to_string();
        }
    }
    token.to_string()
}
