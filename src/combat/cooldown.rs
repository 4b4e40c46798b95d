use std::collections::BTreeMap;

use crate::core::constants::TICKS_PER_SECOND;

/// Remaining cooldown per power id, counted in simulation ticks.
///
/// Independent of resources. Entries drop out of the map as soon as they
/// reach zero, so a missing id always means "ready".
#[derive(Debug, Clone, Default)]
pub struct CooldownTracker {
    remaining: BTreeMap<String, u32>,
}

/// Converts a cooldown in seconds to ticks.
pub fn seconds_to_ticks(seconds: u32) -> u32 {
    seconds.saturating_mul(TICKS_PER_SECOND)
}

/// Whole seconds shown for a tick count, rounded up so a running cooldown
/// never displays as 0.
pub fn ticks_to_display_seconds(ticks: u32) -> u32 {
    ticks.div_ceil(TICKS_PER_SECOND)
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, id: &str, ticks: u32) {
        if ticks == 0 {
            self.remaining.remove(id);
        } else {
            self.remaining.insert(id.to_string(), ticks);
        }
    }

    pub fn remaining_ticks(&self, id: &str) -> u32 {
        self.remaining.get(id).copied().unwrap_or(0)
    }

    pub fn remaining_seconds(&self, id: &str) -> u32 {
        ticks_to_display_seconds(self.remaining_ticks(id))
    }

    pub fn is_ready(&self, id: &str) -> bool {
        self.remaining_ticks(id) == 0
    }

    /// Advances every cooldown by `elapsed` ticks. Returns the ids that
    /// became ready on this call.
    pub fn tick(&mut self, elapsed: u32) -> Vec<String> {
        let mut ready = Vec::new();
        self.remaining.retain(|id, ticks| {
            *ticks = ticks.saturating_sub(elapsed);
            if *ticks == 0 {
                ready.push(id.clone());
                false
            } else {
                true
            }
        });
        ready
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.remaining.iter().map(|(id, ticks)| (id.as_str(), *ticks))
    }

    pub fn clear(&mut self) {
        self.remaining.clear();
    }
}
