//! Wire messages.

use strata_core::{Cell, Generation};

/// Traffic on a coordinator ↔ worker link.
#[derive(Debug)]
pub(crate) enum Collective {
    /// A band of owned rows (scatter downward, gather upward).
    Band {
        generation: Generation,
        cells: Vec<Cell>,
    },
    /// A worker's live-cell count, summed by the coordinator.
    Population { generation: Generation, live: u64 },
    /// The coordinator's reduced decision, broadcast back to every worker.
    Verdict {
        generation: Generation,
        proceed: bool,
    },
}

impl Collective {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Band { .. } => "band",
            Self::Population { .. } => "population",
            Self::Verdict { .. } => "verdict",
        }
    }

    pub(crate) fn generation(&self) -> Generation {
        match self {
            Self::Band { generation, .. }
            | Self::Population { generation, .. }
            | Self::Verdict { generation, .. } => *generation,
        }
    }
}

/// One boundary row sent to a vertical neighbour.
#[derive(Debug)]
pub(crate) struct HaloRow {
    pub generation: Generation,
    pub cells: Vec<Cell>,
}
