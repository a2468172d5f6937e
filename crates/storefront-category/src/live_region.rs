//! ARIA live regions.

use std::fmt;

use crate::dom::{ElementRef, PageDom};

/// Semantic role given to a live region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveRole {
    Status,
    Alert,
}

impl LiveRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            LiveRole::Status => "status",
            LiveRole::Alert => "alert",
        }
    }
}

impl fmt::Display for LiveRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How urgently assistive technology should announce changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Polite,
    Assertive,
}

impl Liveness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Liveness::Polite => "polite",
            Liveness::Assertive => "assertive",
        }
    }
}

impl fmt::Display for Liveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Makes later content changes on an element audible to screen readers.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveRegionAnnouncer;

impl LiveRegionAnnouncer {
    /// Set `role` and `aria-live` on `target`. Repeating the call is harmless.
    pub fn announce(
        &self,
        dom: &dyn PageDom,
        target: &ElementRef,
        role: LiveRole,
        liveness: Liveness,
    ) {
        dom.set_attribute(target, "role", role.as_str());
        dom.set_attribute(target, "aria-live", liveness.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingDom;

    #[test]
    fn test_announce_sets_role_and_liveness() {
        let dom = RecordingDom::default();
        let target = ElementRef::css("span.reset-message");

        LiveRegionAnnouncer.announce(&dom, &target, LiveRole::Status, Liveness::Polite);

        assert_eq!(dom.attribute(&target, "role").as_deref(), Some("status"));
        assert_eq!(dom.attribute(&target, "aria-live").as_deref(), Some("polite"));
    }

    #[test]
    fn test_announce_is_idempotent() {
        let dom = RecordingDom::default();
        let target = ElementRef::css("span.price-filter-message");

        for _ in 0..3 {
            LiveRegionAnnouncer.announce(&dom, &target, LiveRole::Status, Liveness::Assertive);
        }

        assert_eq!(dom.attributes_of(&target).len(), 2);
        assert_eq!(dom.attribute(&target, "aria-live").as_deref(), Some("assertive"));
    }

    #[test]
    fn test_role_and_liveness_display_as_attribute_values() {
        assert_eq!(LiveRole::Status.to_string(), "status");
        assert_eq!(LiveRole::Alert.to_string(), "alert");
        assert_eq!(Liveness::Assertive.to_string(), "assertive");
    }
}
