//! Pane visibility coordination.
//!
//! The layout is purely presentational and derived from flow milestones,
//! never from conversation content. Each mode has a fixed region set with
//! exactly one region expanded; the rest collapse to minimized strips.
//! Mode transitions are monotonic within a session: regions are only ever
//! added, never removed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the fixed UI regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// The scenario intake form.
    Form,
    /// The generated synthetic commerce data.
    Data,
    /// The survey conversation.
    Survey,
    /// The generated review options.
    Reviews,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Region::Form => "form",
            Region::Data => "data",
            Region::Survey => "survey",
            Region::Reviews => "reviews",
        };
        write!(f, "{}", s)
    }
}

/// Layout mode, named by how many regions it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaneMode {
    TwoPane,
    ThreePane,
    FourPane,
}

impl PaneMode {
    /// The fixed region set of this mode, in display order.
    pub fn regions(&self) -> &'static [Region] {
        match self {
            PaneMode::TwoPane => &[Region::Form, Region::Data],
            PaneMode::ThreePane => &[Region::Form, Region::Data, Region::Survey],
            PaneMode::FourPane => &[
                Region::Form,
                Region::Data,
                Region::Survey,
                Region::Reviews,
            ],
        }
    }

    /// Returns true if the region exists in this mode.
    pub fn contains(&self, region: Region) -> bool {
        self.regions().contains(&region)
    }
}

/// Flow milestones that advance the layout, in flow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    /// The intake form was submitted and data generation began.
    IntakeSubmitted,
    /// The survey conversation started.
    SurveyEntered,
    /// Review options were generated.
    ReviewsGenerated,
}

impl Milestone {
    fn ordinal(&self) -> u8 {
        match self {
            Milestone::IntakeSubmitted => 1,
            Milestone::SurveyEntered => 2,
            Milestone::ReviewsGenerated => 3,
        }
    }

    /// The mode in effect once this milestone is reached.
    fn mode(&self) -> PaneMode {
        match self {
            Milestone::IntakeSubmitted => PaneMode::TwoPane,
            Milestone::SurveyEntered => PaneMode::ThreePane,
            Milestone::ReviewsGenerated => PaneMode::FourPane,
        }
    }

    /// The region this milestone introduces and expands by default.
    fn expands(&self) -> Region {
        match self {
            Milestone::IntakeSubmitted => Region::Data,
            Milestone::SurveyEntered => Region::Survey,
            Milestone::ReviewsGenerated => Region::Reviews,
        }
    }
}

/// Tracks which region is expanded and advances the mode on milestones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneCoordinator {
    mode: PaneMode,
    active: Region,
    reached: u8,
}

impl Default for PaneCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl PaneCoordinator {
    /// Creates the initial layout: two panes with the form expanded.
    pub fn new() -> Self {
        Self {
            mode: PaneMode::TwoPane,
            active: Region::Form,
            reached: 0,
        }
    }

    pub fn mode(&self) -> PaneMode {
        self.mode
    }

    /// The currently expanded region.
    pub fn active(&self) -> Region {
        self.active
    }

    /// The regions of the current mode, in display order.
    pub fn regions(&self) -> &'static [Region] {
        self.mode.regions()
    }

    /// Advances the layout for a reached milestone.
    ///
    /// Forward-only and idempotent: a milestone at or behind the current
    /// progress is ignored. On advance, the newly introduced region is
    /// expanded and returned so the host can reset its scroll position.
    pub fn apply_milestone(&mut self, milestone: Milestone) -> Option<Region> {
        if milestone.ordinal() <= self.reached {
            return None;
        }
        self.reached = milestone.ordinal();
        self.mode = milestone.mode();
        self.active = milestone.expands();
        Some(self.active)
    }

    /// Expands a region in response to a click on its minimized strip.
    ///
    /// Returns true if the layout changed. Clicking the already-expanded
    /// region, or a region the current mode does not show, is a no-op.
    pub fn expand(&mut self, region: Region) -> bool {
        if region == self.active || !self.mode.contains(region) {
            return false;
        }
        self.active = region;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_layout_is_two_pane_with_form_expanded() {
        let layout = PaneCoordinator::new();
        assert_eq!(layout.mode(), PaneMode::TwoPane);
        assert_eq!(layout.active(), Region::Form);
        assert_eq!(layout.regions(), [Region::Form, Region::Data]);
    }

    #[test]
    fn intake_submission_expands_the_data_region() {
        let mut layout = PaneCoordinator::new();
        let expanded = layout.apply_milestone(Milestone::IntakeSubmitted);
        assert_eq!(expanded, Some(Region::Data));
        assert_eq!(layout.mode(), PaneMode::TwoPane);
    }

    #[test]
    fn milestones_grow_the_layout_monotonically() {
        let mut layout = PaneCoordinator::new();
        layout.apply_milestone(Milestone::IntakeSubmitted);

        assert_eq!(
            layout.apply_milestone(Milestone::SurveyEntered),
            Some(Region::Survey)
        );
        assert_eq!(layout.mode(), PaneMode::ThreePane);

        assert_eq!(
            layout.apply_milestone(Milestone::ReviewsGenerated),
            Some(Region::Reviews)
        );
        assert_eq!(layout.mode(), PaneMode::FourPane);
        assert_eq!(layout.regions().len(), 4);
    }

    #[test]
    fn repeated_or_stale_milestones_are_ignored() {
        let mut layout = PaneCoordinator::new();
        layout.apply_milestone(Milestone::SurveyEntered);
        layout.expand(Region::Form);

        // Regenerating reviews later must not bounce the layout around.
        assert_eq!(layout.apply_milestone(Milestone::SurveyEntered), None);
        assert_eq!(layout.apply_milestone(Milestone::IntakeSubmitted), None);
        assert_eq!(layout.mode(), PaneMode::ThreePane);
        assert_eq!(layout.active(), Region::Form);
    }

    #[test]
    fn expand_switches_the_active_region() {
        let mut layout = PaneCoordinator::new();
        layout.apply_milestone(Milestone::SurveyEntered);
        assert_eq!(layout.active(), Region::Survey);

        assert!(layout.expand(Region::Form));
        assert_eq!(layout.active(), Region::Form);

        assert!(layout.expand(Region::Survey));
        assert_eq!(layout.active(), Region::Survey);
    }

    #[test]
    fn expanding_the_active_region_is_a_no_op() {
        let mut layout = PaneCoordinator::new();
        layout.apply_milestone(Milestone::SurveyEntered);
        assert!(!layout.expand(Region::Survey));
        assert_eq!(layout.active(), Region::Survey);
    }

    #[test]
    fn expanding_a_region_outside_the_mode_is_a_no_op() {
        let mut layout = PaneCoordinator::new();
        assert!(!layout.expand(Region::Reviews));
        assert!(!layout.expand(Region::Survey));
        assert_eq!(layout.active(), Region::Form);
    }

    #[test]
    fn mode_ordering_matches_region_growth() {
        assert!(PaneMode::TwoPane < PaneMode::ThreePane);
        assert!(PaneMode::ThreePane < PaneMode::FourPane);
    }
}
