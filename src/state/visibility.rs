//! Band Visibility - A pull-model visibility source driven by geometry.
//!
//! For hosts without a native intersection observer (the terminal front-end,
//! a native UI, tests), this source computes band intersection itself:
//! - Newly observed sections report their initial state on the next poll
//! - Afterwards only threshold crossings (enter/leave) produce events
//! - Events within one poll are delivered in document order (top to bottom)
//! - Sections the host can no longer measure are skipped

use std::collections::HashMap;

use log::trace;

use crate::engine::{SectionHost, VisibilitySource};
use crate::types::{SectionId, ViewportBand, VisibilityEvent};

pub struct BandVisibility {
    band: ViewportBand,
    /// Observed sections and their last reported state (`None` = not yet reported).
    observed: HashMap<SectionId, Option<bool>>,
}

impl BandVisibility {
    pub fn new(band: ViewportBand) -> Self {
        Self {
            band,
            observed: HashMap::new(),
        }
    }

    pub fn band(&self) -> ViewportBand {
        self.band
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }
}

impl VisibilitySource for BandVisibility {
    fn observe(&mut self, id: &SectionId) {
        self.observed.entry(id.clone()).or_insert(None);
    }

    fn unobserve(&mut self, id: &SectionId) {
        self.observed.remove(id);
    }

    fn disconnect(&mut self) {
        self.observed.clear();
    }

    fn poll(&mut self, host: &dyn SectionHost) -> Vec<VisibilityEvent> {
        let viewport = host.viewport();

        let mut measured: Vec<(SectionId, f32, bool)> = self
            .observed
            .keys()
            .filter_map(|id| {
                let bounds = host.section_bounds(id)?;
                Some((id.clone(), bounds.top, self.band.intersects(bounds, viewport)))
            })
            .collect();

        // Document order
        measured.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut events = Vec::new();
        for (id, _, satisfying) in measured {
            let Some(last) = self.observed.get_mut(&id) else {
                continue;
            };
            if *last == Some(satisfying) {
                continue;
            }
            *last = Some(satisfying);
            trace!("section {id} {}", if satisfying { "entered band" } else { "left band" });
            events.push(VisibilityEvent::new(id, satisfying));
        }

        events
    }
}
