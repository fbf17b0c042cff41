//! Participant band layout for choreography activities.
//!
//! A choreography activity draws one horizontal band per participant. The bands
//! are split into a top group that stacks down from the activity's top edge and
//! a bottom group that stacks up from its bottom edge; the activity's name sits
//! in the gap between them.
//!
//! Layout never trusts the persisted band geometry beyond its vertical order:
//! x, width, height and y are all recomputed from the activity bounds and the
//! [`BandHeightPolicy`]. The policy heights are weights: they are scaled so the
//! bands together span the activity exactly, and the two groups meet where the
//! top group ends.

use std::fmt;

use log::debug;
use serde::Deserialize;

use chorus_core::{geometry::Bounds, identifier::Id, semantic::ElementKind};

/// Number of bands in the top group for `count` bands.
///
/// A single band is in the top group.
pub fn partition_index(count: usize) -> usize {
    count.div_ceil(2)
}

/// Vertical position of a band within its activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandPosition {
    Top,
    Middle,
    Bottom,
}

/// Structural role of a band: position plus whether its participant initiates
/// the activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BandKind {
    position: BandPosition,
    initiating: bool,
}

impl BandKind {
    pub fn new(position: BandPosition, initiating: bool) -> Self {
        Self {
            position,
            initiating,
        }
    }

    /// The role of the band at `index` among `count` bands in canonical order.
    ///
    /// The first band is top, the last is bottom. With one band it is top.
    pub fn for_index(index: usize, count: usize, initiating: bool) -> Self {
        let position = if index == 0 {
            BandPosition::Top
        } else if index + 1 == count {
            BandPosition::Bottom
        } else {
            BandPosition::Middle
        };
        Self::new(position, initiating)
    }

    pub fn position(self) -> BandPosition {
        self.position
    }

    pub fn is_initiating(self) -> bool {
        self.initiating
    }

    /// The role tag, e.g. `top_initiating` or `bottom_non_initiating`.
    pub fn as_str(self) -> &'static str {
        match (self.position, self.initiating) {
            (BandPosition::Top, true) => "top_initiating",
            (BandPosition::Top, false) => "top_non_initiating",
            (BandPosition::Middle, true) => "middle_initiating",
            (BandPosition::Middle, false) => "middle_non_initiating",
            (BandPosition::Bottom, true) => "bottom_initiating",
            (BandPosition::Bottom, false) => "bottom_non_initiating",
        }
    }
}

impl fmt::Display for BandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural properties of a participant that decide its band height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BandTraits {
    pub initiating: bool,
    pub multi_instance: bool,
}

/// Height rule table for participant bands.
///
/// Heights are additive: every band gets `base`, multi-instance participants
/// add `multi_instance` for the marker row, and the initiating participant adds
/// `initiating`. Layout uses them as relative weights, see [`fit_heights`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BandHeightPolicy {
    base: f32,
    multi_instance: f32,
    initiating: f32,
}

impl Default for BandHeightPolicy {
    fn default() -> Self {
        Self {
            base: 20.0,
            multi_instance: 20.0,
            initiating: 0.0,
        }
    }
}

impl BandHeightPolicy {
    pub fn new(base: f32, multi_instance: f32, initiating: f32) -> Self {
        Self {
            base,
            multi_instance,
            initiating,
        }
    }

    pub fn height_of(&self, traits: BandTraits) -> f32 {
        let mut height = self.base;
        if traits.multi_instance {
            height += self.multi_instance;
        }
        if traits.initiating {
            height += self.initiating;
        }
        height
    }
}

/// One participant's band as found in the DI plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandInput {
    pub participant: Id,
    /// Id of the band's DI record.
    pub di: Id,
    /// Persisted bounds; only the vertical order is used.
    pub current: Bounds,
    pub traits: BandTraits,
    pub message_visible: Option<bool>,
}

/// Scales rule-table heights so they sum to `available`.
///
/// Proportions are kept. When every weight is zero (or not finite) the space is
/// shared equally. Negative weights count as zero.
pub fn fit_heights(weights: &[f32], available: f32) -> Vec<f32> {
    let available = available.max(0.0);
    let weights: Vec<f32> = weights
        .iter()
        .map(|weight| if weight.is_finite() { weight.max(0.0) } else { 0.0 })
        .collect();
    let total: f32 = weights.iter().sum();

    if total > 0.0 && total.is_finite() {
        weights.iter().map(|weight| weight / total * available).collect()
    } else {
        let share = available / weights.len().max(1) as f32;
        vec![share; weights.len()]
    }
}

/// Computed geometry and role of one band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandLayout {
    /// Position in canonical order.
    pub index: usize,
    pub participant: Id,
    pub di: Id,
    pub bounds: Bounds,
    pub kind: BandKind,
    pub message_visible: bool,
}

/// Orders, sizes, positions and tags the bands of one choreography activity.
///
/// Bands are returned in canonical order: ascending persisted y, ties kept in
/// input order.
pub fn layout_bands(
    activity_kind: ElementKind,
    activity: Bounds,
    mut bands: Vec<BandInput>,
    policy: &BandHeightPolicy,
) -> Vec<BandLayout> {
    bands.sort_by(|a, b| a.current.min_y().total_cmp(&b.current.min_y()));

    let count = bands.len();
    let split = partition_index(count);
    let weights: Vec<f32> = bands.iter().map(|band| policy.height_of(band.traits)).collect();
    let mut heights = fit_heights(&weights, activity.height());
    let mut ys = vec![activity.min_y(); count];

    let mut top_offset = 0.0;
    for (y, height) in ys.iter_mut().zip(&heights).take(split) {
        *y = activity.min_y() + top_offset;
        top_offset += height;
    }
    let boundary = activity.min_y() + top_offset;

    let mut bottom_offset = 0.0;
    for idx in (split..count).rev() {
        bottom_offset += heights[idx];
        ys[idx] = activity.max_y() - bottom_offset;
    }

    // Absorb float drift so the first bottom band starts where the top group ends
    if split < count {
        heights[split] = (ys[split] + heights[split] - boundary).max(0.0);
        ys[split] = boundary;
    }

    let shows_messages = activity_kind.supports_message_visibility();

    bands
        .iter()
        .enumerate()
        .map(|(idx, band)| {
            let bounds = Bounds::from_rect(activity.min_x(), ys[idx], activity.width(), heights[idx]);
            let kind = BandKind::for_index(idx, count, band.traits.initiating);
            let message_visible = shows_messages && band.message_visible.unwrap_or(true);
            debug!(
                participant:% = band.participant,
                kind:% = kind,
                y = bounds.min_y(),
                height = bounds.height();
                "Band laid out"
            );
            BandLayout {
                index: idx,
                participant: band.participant,
                di: band.di,
                bounds,
                kind,
                message_visible,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn input(name: &str, y: f32) -> BandInput {
        BandInput {
            participant: Id::new(name),
            di: Id::new(&format!("{name}_di")),
            current: Bounds::from_rect(0.0, y, 10.0, 20.0),
            traits: BandTraits::default(),
            message_visible: None,
        }
    }

    #[test]
    fn test_partition_index() {
        assert_eq!(partition_index(0), 0);
        assert_eq!(partition_index(1), 1);
        assert_eq!(partition_index(2), 1);
        assert_eq!(partition_index(3), 2);
        assert_eq!(partition_index(4), 2);
        assert_eq!(partition_index(5), 3);
    }

    #[test]
    fn test_band_kind_tags() {
        assert_eq!(BandKind::for_index(0, 3, true).as_str(), "top_initiating");
        assert_eq!(BandKind::for_index(1, 3, false).as_str(), "middle_non_initiating");
        assert_eq!(BandKind::for_index(2, 3, false).as_str(), "bottom_non_initiating");
        assert_eq!(BandKind::for_index(0, 1, false).as_str(), "top_non_initiating");
    }

    #[test]
    fn test_height_policy_is_additive() {
        let policy = BandHeightPolicy::new(20.0, 20.0, 5.0);
        assert_approx_eq!(f32, policy.height_of(BandTraits::default()), 20.0);
        assert_approx_eq!(
            f32,
            policy.height_of(BandTraits {
                initiating: true,
                multi_instance: true
            }),
            45.0
        );
    }

    #[test]
    fn test_three_bands_sorted_and_stacked() {
        let activity = Bounds::from_rect(100.0, 50.0, 100.0, 120.0);
        let bands = vec![input("P1", 50.0), input("P3", 150.0), input("P2", 100.0)];

        let layout = layout_bands(
            ElementKind::ChoreographyTask,
            activity,
            bands,
            &BandHeightPolicy::default(),
        );

        let order: Vec<String> = layout.iter().map(|b| b.participant.to_string()).collect();
        assert_eq!(order, vec!["P1", "P2", "P3"]);

        // Equal weights split the 120 high activity into three 40 high bands
        assert_approx_eq!(f32, layout[0].bounds.min_y(), 50.0, epsilon = 1e-3);
        assert_approx_eq!(f32, layout[1].bounds.min_y(), 90.0, epsilon = 1e-3);
        assert_approx_eq!(f32, layout[2].bounds.min_y(), 130.0, epsilon = 1e-3);
        assert_approx_eq!(f32, layout[2].bounds.max_y(), activity.max_y(), epsilon = 1e-3);
        for pair in layout.windows(2) {
            assert_approx_eq!(f32, pair[0].bounds.max_y(), pair[1].bounds.min_y(), epsilon = 1e-3);
        }

        for band in &layout {
            assert_approx_eq!(f32, band.bounds.min_x(), 100.0);
            assert_approx_eq!(f32, band.bounds.width(), 100.0);
            assert!(band.message_visible);
        }
    }

    #[test]
    fn test_sort_is_stable_for_equal_y() {
        let activity = Bounds::from_rect(0.0, 0.0, 100.0, 100.0);
        let bands = vec![input("A", 10.0), input("B", 10.0), input("C", 0.0)];

        let layout = layout_bands(
            ElementKind::ChoreographyTask,
            activity,
            bands,
            &BandHeightPolicy::default(),
        );

        let order: Vec<String> = layout.iter().map(|b| b.participant.to_string()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_message_visibility() {
        let activity = Bounds::from_rect(0.0, 0.0, 100.0, 100.0);
        let mut hidden = input("A", 0.0);
        hidden.message_visible = Some(false);
        let bands = vec![hidden, input("B", 50.0)];

        let task = layout_bands(
            ElementKind::ChoreographyTask,
            activity,
            bands.clone(),
            &BandHeightPolicy::default(),
        );
        assert!(!task[0].message_visible);
        assert!(task[1].message_visible);

        let sub = layout_bands(
            ElementKind::SubChoreography,
            activity,
            bands,
            &BandHeightPolicy::default(),
        );
        assert!(sub.iter().all(|band| !band.message_visible));
    }

    #[test]
    fn test_multi_instance_band_is_taller() {
        let activity = Bounds::from_rect(0.0, 0.0, 100.0, 90.0);
        let mut multi = input("B", 70.0);
        multi.traits.multi_instance = true;
        let bands = vec![input("A", 0.0), multi];

        let layout = layout_bands(
            ElementKind::ChoreographyTask,
            activity,
            bands,
            &BandHeightPolicy::default(),
        );

        // Weights 20 and 40 share 90 as 30 and 60
        assert_approx_eq!(f32, layout[0].bounds.height(), 30.0, epsilon = 1e-3);
        assert_approx_eq!(f32, layout[1].bounds.height(), 60.0, epsilon = 1e-3);
        assert_approx_eq!(f32, layout[1].bounds.min_y(), 30.0, epsilon = 1e-3);
        assert_approx_eq!(f32, layout[1].bounds.max_y(), 90.0, epsilon = 1e-3);
    }

    #[test]
    fn test_short_activity_scales_bands_down() {
        let activity = Bounds::from_rect(0.0, 0.0, 100.0, 30.0);
        let bands = vec![input("A", 0.0), input("B", 10.0), input("C", 20.0)];

        let layout = layout_bands(
            ElementKind::ChoreographyTask,
            activity,
            bands,
            &BandHeightPolicy::default(),
        );

        let spans: Vec<(f32, f32)> = layout
            .iter()
            .map(|band| (band.bounds.min_y(), band.bounds.max_y()))
            .collect();
        for (expected, (min_y, max_y)) in [(0.0, 10.0), (10.0, 20.0), (20.0, 30.0)].iter().zip(&spans) {
            assert_approx_eq!(f32, expected.0, *min_y, epsilon = 1e-3);
            assert_approx_eq!(f32, expected.1, *max_y, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_fit_heights() {
        let fitted = fit_heights(&[20.0, 40.0, 20.0], 160.0);
        assert_approx_eq!(f32, fitted[0], 40.0);
        assert_approx_eq!(f32, fitted[1], 80.0);
        assert_approx_eq!(f32, fitted[2], 40.0);

        let zero = fit_heights(&[0.0, 0.0], 50.0);
        assert_eq!(zero, vec![25.0, 25.0]);

        assert!(fit_heights(&[], 50.0).is_empty());
        assert_eq!(fit_heights(&[20.0], -5.0), vec![0.0]);
    }

    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        fn band_inputs() -> impl Strategy<Value = Vec<(f32, bool, bool)>> {
            prop::collection::vec((0.0f32..500.0, any::<bool>(), any::<bool>()), 1..8)
        }

        proptest! {
            #[test]
            fn layout_preserves_count_roles_and_order(
                raw in band_inputs(),
                activity_height in 1.0f32..400.0,
            ) {
                let count = raw.len();
                let activity = Bounds::from_rect(0.0, 0.0, 100.0, activity_height);
                let bands: Vec<BandInput> = raw
                    .iter()
                    .enumerate()
                    .map(|(idx, (y, initiating, multi_instance))| BandInput {
                        participant: Id::new(&format!("P{idx}")),
                        di: Id::new(&format!("P{idx}_di")),
                        current: Bounds::from_rect(0.0, *y, 100.0, 20.0),
                        traits: BandTraits {
                            initiating: *initiating,
                            multi_instance: *multi_instance,
                        },
                        message_visible: None,
                    })
                    .collect();

                let layout = layout_bands(
                    ElementKind::ChoreographyTask,
                    activity,
                    bands,
                    &BandHeightPolicy::default(),
                );
                prop_assert_eq!(layout.len(), count);

                let tops = layout.iter().filter(|b| b.kind.position() == BandPosition::Top).count();
                let bottoms = layout.iter().filter(|b| b.kind.position() == BandPosition::Bottom).count();
                prop_assert_eq!(tops, 1);
                prop_assert_eq!(bottoms, usize::from(count >= 2));

                // Canonical order follows persisted y, and computed y keeps it
                let persisted_y = |band: &BandLayout| {
                    raw.iter()
                        .enumerate()
                        .find(|(idx, _)| band.participant == Id::new(&format!("P{idx}")))
                        .map(|(_, (y, _, _))| *y)
                        .unwrap()
                };
                for pair in layout.windows(2) {
                    prop_assert!(persisted_y(&pair[0]) <= persisted_y(&pair[1]));
                    prop_assert!(pair[0].bounds.min_y() <= pair[1].bounds.min_y());
                }

                // Top group is flush with the top edge and contiguous
                let split = partition_index(count);
                let mut expected_top = activity.min_y();
                for band in &layout[..split] {
                    prop_assert!((band.bounds.min_y() - expected_top).abs() < 1e-3);
                    expected_top = band.bounds.max_y();
                }

                // Bottom group is flush with the bottom edge and contiguous
                let mut expected_bottom = activity.max_y();
                for band in layout[split..].iter().rev() {
                    prop_assert!((band.bounds.max_y() - expected_bottom).abs() < 1e-3);
                    expected_bottom = band.bounds.min_y();
                }

                // Groups meet without overlap and together span the activity
                if split < count {
                    prop_assert!((layout[split - 1].bounds.max_y() - layout[split].bounds.min_y()).abs() < 1e-3);
                }
                let total: f32 = layout.iter().map(|b| b.bounds.height()).sum();
                prop_assert!((total - activity.height()).abs() < 1e-2);
            }

            #[test]
            fn partition_splits_evenly(count in 1usize..64) {
                let top = partition_index(count);
                prop_assert!(top >= count - top);
                prop_assert!(top - (count - top) <= 1);
            }
        }
    }
}
