use std::collections::BTreeSet;

/// Default reading-progress thresholds, in percent.
pub const DEFAULT_MILESTONES: [u8; 4] = [25, 50, 75, 100];

/// Scroll-depth thresholds, each fired at most once per page load.
#[derive(Debug, Clone)]
pub struct ScrollMilestones {
    thresholds: BTreeSet<u8>,
    fired: BTreeSet<u8>,
}

impl Default for ScrollMilestones {
    fn default() -> Self {
        Self::new(DEFAULT_MILESTONES)
    }
}

impl ScrollMilestones {
    /// Thresholds above 100 can never be reached and are dropped.
    pub fn new(thresholds: impl IntoIterator<Item = u8>) -> Self {
        Self {
            thresholds: thresholds.into_iter().filter(|t| *t <= 100).collect(),
            fired: BTreeSet::new(),
        }
    }

    /// Marks every unfired threshold at or below `percent` as fired and
    /// returns them in ascending order.
    pub fn check(&mut self, percent: f64) -> Vec<u8> {
        let crossed: Vec<u8> = self
            .thresholds
            .iter()
            .copied()
            .filter(|t| !self.fired.contains(t) && f64::from(*t) <= percent)
            .collect();
        self.fired.extend(crossed.iter().copied());
        crossed
    }

    pub fn fired(&self) -> impl Iterator<Item = u8> + '_ {
        self.fired.iter().copied()
    }

    pub fn all_fired(&self) -> bool {
        self.fired.len() == self.thresholds.len()
    }
}
