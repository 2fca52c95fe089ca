//! The change notification message.

use serde::{Deserialize, Serialize};

/// "The data behind `locator` changed."
///
/// `locator` is the textual form of the locator the mutating call was made
/// against (`content://{authority}/products` or `.../products/{id}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeNotification {
    pub locator: String,
}

impl ChangeNotification {
    pub fn new(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
        }
    }

    /// Whether an observer watching `watched` should refresh.
    ///
    /// True when the two locators are equal or one is a path-descendant of the
    /// other: a change to a collection invalidates its items, and a change to
    /// an item invalidates the collection listing it.
    pub fn affects(&self, watched: &str) -> bool {
        let changed = self.locator.trim_end_matches('/');
        let watched = watched.trim_end_matches('/');
        changed == watched || is_descendant(changed, watched) || is_descendant(watched, changed)
    }
}

fn is_descendant(path: &str, ancestor: &str) -> bool {
    path.strip_prefix(ancestor)
        .is_some_and(|rest| rest.starts_with('/'))
}

impl core::fmt::Display for ChangeNotification {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "changed: {}", self.locator)
    }
}
