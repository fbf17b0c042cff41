//! Lookup of participant band records by owning activity.

use std::collections::HashMap;

use log::{debug, warn};

use chorus_core::{di::Diagram, identifier::Id};

/// Maps `(activity DI id, participant id)` to the band's DI record id.
///
/// Built once per import pass from the diagram plane.
#[derive(Debug, Default, Clone)]
pub struct DiIndex {
    bands: HashMap<(Id, Id), Id>,
}

impl DiIndex {
    /// Indexes every band record of `diagram`.
    ///
    /// When two records claim the same activity and participant the first one
    /// wins.
    pub fn build(diagram: &Diagram) -> Self {
        let mut bands = HashMap::new();
        for record in diagram.elements() {
            let (Some(activity), Some(participant)) =
                (record.choreography_activity_shape(), record.bpmn_element())
            else {
                continue;
            };
            if let Some(first) = bands.get(&(activity, participant)) {
                warn!(
                    activity:% = activity,
                    participant:% = participant,
                    kept:% = first,
                    ignored:% = record.id();
                    "Duplicate participant band record"
                );
                continue;
            }
            bands.insert((activity, participant), record.id());
        }

        debug!(bands_count = bands.len(); "Band index built");
        Self { bands }
    }

    /// The band record of `participant` inside the activity drawn by `activity_di`.
    pub fn band(&self, activity_di: Id, participant: Id) -> Option<Id> {
        self.bands.get(&(activity_di, participant)).copied()
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}
