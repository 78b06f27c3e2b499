//! Conway's B3/S23 rule.

use strata_core::{Cell, ALIVE, DEAD};

/// Next state of a cell with `live_neighbours` live cells in its Moore
/// neighbourhood.
///
/// A live cell survives with 2 or 3 neighbours; a dead cell is born with
/// exactly 3. Everything else is dead.
#[inline]
pub const fn next_state(cell: Cell, live_neighbours: u8) -> Cell {
    match (cell != DEAD, live_neighbours) {
        (true, 2 | 3) => ALIVE,
        (false, 3) => ALIVE,
        _ => DEAD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_neighbourhood_maps_to_rule() {
        // All 2^8 neighbour configurations, collapsed to their counts.
        for mask in 0u16..256 {
            let count = mask.count_ones() as u8;
            let born = next_state(DEAD, count);
            let kept = next_state(ALIVE, count);
            assert_eq!(born == ALIVE, count == 3, "dead cell, mask {mask:08b}");
            assert_eq!(
                kept == ALIVE,
                count == 2 || count == 3,
                "live cell, mask {mask:08b}"
            );
        }
    }

    #[test]
    fn crowding_and_isolation_kill() {
        for n in [0, 1, 4, 5, 6, 7, 8] {
            assert_eq!(next_state(ALIVE, n), DEAD);
        }
    }
}
