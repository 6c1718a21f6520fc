// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity type allow-list.

use std::collections::HashSet;

/// Gate applied to every activity before any point is built.
///
/// An empty allow-list lets everything through.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    allowed: HashSet<String>,
}

impl ActivityFilter {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    /// Filter that admits every activity.
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn allows(&self, activity_type: Option<&str>) -> bool {
        if self.allowed.is_empty() {
            return true;
        }
        activity_type.is_some_and(|t| self.allowed.contains(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_allow_list_admits_everything() {
        let filter = ActivityFilter::allow_all();
        assert!(filter.allows(Some("RUNNING")));
        assert!(filter.allows(Some("")));
        assert!(filter.allows(None));
    }

    #[test]
    fn test_allow_list_admits_only_listed_types() {
        let filter = ActivityFilter::new(["RUNNING", "CYCLING"]);
        assert!(filter.allows(Some("RUNNING")));
        assert!(filter.allows(Some("CYCLING")));
        assert!(!filter.allows(Some("running")));
        assert!(!filter.allows(Some("SWIMMING")));
        assert!(!filter.allows(None));
    }
}
