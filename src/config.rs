//! Session configuration

use serde::{Deserialize, Serialize};

use crate::util::time::TICKS_PER_SECOND;

/// Knobs the UI layer hands the core when a match starts. Both peers must
/// agree on the seed; the rest is local tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Shared random seed negotiated during signaling
    pub seed: u64,
    /// Rolling window size for the median RTT estimate
    pub delays_window_size: usize,
    /// Capacity of the incoming/outgoing intent rings
    pub max_pending_intents: usize,
    /// Nominal simulation rate; fixed at 60 in practice
    pub ticks_per_second: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 0,
            delays_window_size: 9,
            max_pending_intents: 60,
            ticks_per_second: TICKS_PER_SECOND,
        }
    }
}
