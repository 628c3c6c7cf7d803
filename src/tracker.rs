use std::collections::HashMap;

use log::debug;

use crate::geometry::Geometry;
use crate::parsing::HeadingMarker;

/// Extra rows of clearance beyond the anchor scroll margin; a heading
/// counts as passed only once its top is this far under the bar line.
pub const SCROLL_MARGIN_EXTRA_ROWS: i32 = 2;

/// Outcome of one recomputation: the current section, the bar label and
/// the sidebar row to highlight. Applied by the caller; computing it has
/// no side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct TocSelection {
    pub active_heading: Option<usize>,
    pub label: String,
    pub active_item: Option<usize>,
}

/// Decides which section heading is current. Holds the static registry
/// built at startup; every live position is sampled through [`Geometry`]
/// at call time.
pub struct TocTracker {
    headings: Vec<HeadingMarker>,
    registry: HashMap<String, usize>,
    default_label: String,
}

impl TocTracker {
    pub fn new(
        headings: Vec<HeadingMarker>,
        registry: HashMap<String, usize>,
        default_label: String,
    ) -> Self {
        Self {
            headings,
            registry,
            default_label,
        }
    }

    pub fn headings(&self) -> &[HeadingMarker] {
        &self.headings
    }

    pub fn default_label(&self) -> &str {
        &self.default_label
    }

    /// One full pass: compute the threshold, classify every heading
    /// against it, pick the current one and derive what to display.
    ///
    /// `bar_bottom` is the screen row just below the bar the content
    /// scrolls under. Geometry is read fresh on every call; layout may
    /// have changed since the last tick.
    pub fn recompute(&self, geometry: &dyn Geometry, bar_bottom: i32) -> TocSelection {
        // Construction is guarded on the document having an anchored
        // element, so the margin always resolves here.
        let margin = geometry
            .scroll_margin_top()
            .expect("document has an anchored element") as i32;
        let threshold = bar_bottom + margin + SCROLL_MARGIN_EXTRA_ROWS;

        let mut active: Option<(usize, i32)> = None;
        for index in 0..self.headings.len() {
            let Some(rect) = geometry.section_rect(index) else {
                continue;
            };
            if rect.top < threshold {
                match active {
                    // Keep the incumbent only while it sits strictly lower;
                    // an equal top hands the selection to the later heading.
                    Some((_, best_top)) if rect.top < best_top => {}
                    _ => active = Some((index, rect.top)),
                }
            }
        }

        let selection = match active {
            Some((index, _)) => {
                let heading = &self.headings[index];
                TocSelection {
                    active_heading: Some(index),
                    label: heading.title.leading_content(),
                    active_item: heading
                        .id
                        .as_deref()
                        .and_then(|id| self.registry.get(id).copied()),
                }
            }
            None => TocSelection {
                active_heading: None,
                label: self.default_label.clone(),
                active_item: None,
            },
        };
        debug!(
            "Recomputed section: threshold {}, heading {:?}, label {:?}",
            threshold, selection.active_heading, selection.label
        );
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SimulatedGeometry;
    use crate::markdown::{Style, Text, TextNode};

    fn marker(id: Option<&str>, title: &str) -> HeadingMarker {
        HeadingMarker {
            id: id.map(str::to_string),
            title: Text::from(title),
        }
    }

    /// Three sections with sidebar rows for setup and usage only.
    fn guide_tracker() -> TocTracker {
        let headings = vec![
            marker(Some("intro"), "Intro"),
            marker(Some("setup"), "Setup"),
            marker(Some("usage"), "Usage"),
        ];
        let registry = HashMap::from([("setup".to_string(), 0), ("usage".to_string(), 1)]);
        TocTracker::new(headings, registry, "User Guide".to_string())
    }

    #[test]
    fn test_nothing_past_falls_back_to_default_label() {
        let tracker = guide_tracker();
        let geometry = SimulatedGeometry::new(&[60, 560, 1060], 1);
        // threshold = 47 + 1 + 2 = 50, below every heading top
        let selection = tracker.recompute(&geometry, 47);

        assert_eq!(selection.active_heading, None);
        assert_eq!(selection.label, "User Guide");
        assert_eq!(selection.active_item, None);
    }

    #[test]
    fn test_single_past_heading_is_selected() {
        let tracker = guide_tracker();
        let geometry = SimulatedGeometry::new(&[10, 560, 1060], 1);
        let selection = tracker.recompute(&geometry, 47);

        assert_eq!(selection.active_heading, Some(0));
        assert_eq!(selection.label, "Intro");
        assert_eq!(selection.active_item, None, "intro has no sidebar row");
    }

    #[test]
    fn test_lowest_past_heading_wins() {
        let tracker = guide_tracker();
        let geometry = SimulatedGeometry::new(&[0, 500, 1000], 1);
        // threshold 600: intro and setup are both past, setup sits lower
        let selection = tracker.recompute(&geometry, 597);

        assert_eq!(selection.active_heading, Some(1));
        assert_eq!(selection.label, "Setup");
        assert_eq!(selection.active_item, Some(0));
    }

    #[test]
    fn test_heading_on_threshold_is_not_past() {
        let tracker = guide_tracker();
        let geometry = SimulatedGeometry::new(&[50, 560, 1060], 1);
        // threshold 50; top == threshold stays on the visible side
        let selection = tracker.recompute(&geometry, 47);
        assert_eq!(selection.active_heading, None);

        let geometry = SimulatedGeometry::new(&[49, 560, 1060], 1);
        let selection = tracker.recompute(&geometry, 47);
        assert_eq!(selection.active_heading, Some(0));
    }

    #[test]
    fn test_equal_tops_select_the_later_heading() {
        let tracker = guide_tracker();
        let geometry = SimulatedGeometry::new(&[-5, -5, 1060], 1);
        let selection = tracker.recompute(&geometry, 47);

        assert_eq!(selection.active_heading, Some(1));
        assert_eq!(selection.label, "Setup");
    }

    #[test]
    fn test_active_heading_missing_from_registry_updates_label_only() {
        let headings = vec![marker(Some("orphan"), "Orphan Section")];
        let tracker = TocTracker::new(headings, HashMap::new(), "Default".to_string());
        let geometry = SimulatedGeometry::new(&[-10], 1);
        let selection = tracker.recompute(&geometry, 0);

        assert_eq!(selection.active_heading, Some(0));
        assert_eq!(selection.label, "Orphan Section");
        assert_eq!(selection.active_item, None);
    }

    #[test]
    fn test_heading_without_identity_can_still_be_current() {
        let headings = vec![marker(None, "Unnamed")];
        let registry = HashMap::from([("unnamed".to_string(), 0)]);
        let tracker = TocTracker::new(headings, registry, "Default".to_string());
        let geometry = SimulatedGeometry::new(&[-10], 1);
        let selection = tracker.recompute(&geometry, 0);

        assert_eq!(selection.label, "Unnamed");
        assert_eq!(selection.active_item, None);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let tracker = guide_tracker();
        let geometry = SimulatedGeometry::new(&[0, 500, 1000], 1);
        let first = tracker.recompute(&geometry, 597);
        let second = tracker.recompute(&geometry, 597);
        assert_eq!(first, second);
    }

    #[test]
    fn test_selection_is_monotonic_as_threshold_grows() {
        let tracker = guide_tracker();
        let geometry = SimulatedGeometry::new(&[10, 20, 30], 1);

        let mut previous: i64 = -1;
        for bar_bottom in -10..40 {
            let selection = tracker.recompute(&geometry, bar_bottom);
            let current = selection.active_heading.map_or(-1, |index| index as i64);
            assert!(
                current >= previous,
                "selection regressed from {previous} to {current} at bar_bottom {bar_bottom}"
            );
            previous = current;
        }
    }

    #[test]
    fn test_label_takes_leading_text_run_only() {
        let mut title = Text::default();
        title.push_text(TextNode::from("Install "));
        title.push_text(TextNode::new("guide".to_string(), Some(Style::Strong)));
        let headings = vec![HeadingMarker {
            id: Some("install".to_string()),
            title,
        }];
        let tracker = TocTracker::new(headings, HashMap::new(), "Default".to_string());
        let geometry = SimulatedGeometry::new(&[-1], 1);
        let selection = tracker.recompute(&geometry, 0);

        assert_eq!(selection.label, "Install ");
    }
}
