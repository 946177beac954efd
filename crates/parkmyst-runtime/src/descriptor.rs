//! Component kind descriptors.

use parkmyst_core::identity::PermissionTier;

/// A feed kind a component may publish, with the tier it is published at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedTemplate {
    /// Output template name.
    pub kind: &'static str,
    /// Tier the feed is created with.
    pub tier: PermissionTier,
}

impl FeedTemplate {
    /// A feed kind visible to everyone.
    #[must_use]
    pub const fn public(kind: &'static str) -> Self {
        Self {
            kind,
            tier: PermissionTier::User,
        }
    }

    /// A feed kind restricted to `tier` and above.
    #[must_use]
    pub const fn restricted(kind: &'static str, tier: PermissionTier) -> Self {
        Self { kind, tier }
    }
}

/// Lifecycle behaviour switches of a component kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct DescriptorFlags {
    /// Started by the scheduler at game start.
    pub auto_start: bool,
    /// On completion the scheduler starts every declared successor.
    pub uses_successor_list: bool,
    /// Completion is followed by clean-up and a return to idle.
    pub clean_up_on_completion: bool,
    /// Start signals are honoured only while idle. When `false` the instance
    /// is armed at game start and every start signal is an activation.
    pub default_start_enabled: bool,
    /// Completion with clean-up ends the instance for good.
    pub one_shot: bool,
}

impl Default for DescriptorFlags {
    fn default() -> Self {
        Self {
            auto_start: false,
            uses_successor_list: true,
            clean_up_on_completion: true,
            default_start_enabled: true,
            one_shot: false,
        }
    }
}

/// Immutable metadata of a component kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    /// Unique kind name used by game graphs.
    pub kind: &'static str,
    /// Human-readable summary for authoring tools.
    pub description: &'static str,
    /// Configuration fields that must be present.
    pub required_fields: &'static [&'static str],
    /// Feed kinds the component publishes.
    pub feeds: &'static [FeedTemplate],
    /// Lifecycle switches.
    pub flags: DescriptorFlags,
}

impl Descriptor {
    /// Starts a descriptor with default flags and no fields or feeds.
    #[must_use]
    pub fn new(kind: &'static str, description: &'static str) -> Self {
        Self {
            kind,
            description,
            required_fields: &[],
            feeds: &[],
            flags: DescriptorFlags::default(),
        }
    }

    /// Sets the required configuration fields.
    #[must_use]
    pub fn with_fields(mut self, fields: &'static [&'static str]) -> Self {
        self.required_fields = fields;
        self
    }

    /// Sets the declared feed kinds.
    #[must_use]
    pub fn with_feeds(mut self, feeds: &'static [FeedTemplate]) -> Self {
        self.feeds = feeds;
        self
    }

    /// Marks the kind as started at game start.
    #[must_use]
    pub fn auto_start(mut self) -> Self {
        self.flags.auto_start = true;
        self
    }

    /// The kind picks its own targets instead of the successor list.
    #[must_use]
    pub fn without_successor_list(mut self) -> Self {
        self.flags.uses_successor_list = false;
        self
    }

    /// The kind keeps its content after completing.
    #[must_use]
    pub fn without_clean_up_on_completion(mut self) -> Self {
        self.flags.clean_up_on_completion = false;
        self
    }

    /// The kind is armed at game start and counts start signals.
    #[must_use]
    pub fn without_default_start(mut self) -> Self {
        self.flags.default_start_enabled = false;
        self
    }

    /// The kind ends for good after its first clean completion.
    #[must_use]
    pub fn one_shot(mut self) -> Self {
        self.flags.one_shot = true;
        self
    }

    /// Tier of the declared feed `kind`, if declared.
    #[must_use]
    pub fn feed_tier(&self, kind: &str) -> Option<PermissionTier> {
        self.feeds.iter().find(|f| f.kind == kind).map(|f| f.tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flags() {
        let descriptor = Descriptor::new("StartNode", "starts");

        assert!(!descriptor.flags.auto_start);
        assert!(descriptor.flags.uses_successor_list);
        assert!(descriptor.flags.clean_up_on_completion);
        assert!(descriptor.flags.default_start_enabled);
        assert!(!descriptor.flags.one_shot);
    }

    #[test]
    fn test_builder_sets_flags_and_feeds() {
        const FEEDS: &[FeedTemplate] = &[
            FeedTemplate::public("stationUserWaiting"),
            FeedTemplate::restricted("stationController", PermissionTier::Controller),
        ];

        let descriptor = Descriptor::new("Threshold", "counts")
            .with_fields(&["type", "amount"])
            .with_feeds(FEEDS)
            .without_successor_list()
            .without_clean_up_on_completion()
            .without_default_start();

        assert!(!descriptor.flags.uses_successor_list);
        assert!(!descriptor.flags.clean_up_on_completion);
        assert!(!descriptor.flags.default_start_enabled);
        assert_eq!(descriptor.required_fields, &["type", "amount"]);
        assert_eq!(
            descriptor.feed_tier("stationController"),
            Some(PermissionTier::Controller)
        );
        assert_eq!(descriptor.feed_tier("missing"), None);
    }
}
