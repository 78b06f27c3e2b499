//! Standard Life patterns used across the test suites.

use strata_core::Pattern;

/// Period-2 oscillator, horizontal phase (1x3).
pub fn blinker() -> Pattern {
    Pattern::from_rows(&[[1, 1, 1]])
}

/// 2x2 still life.
pub fn block() -> Pattern {
    Pattern::from_rows(&[[1, 1], [1, 1]])
}

/// 3x4 still life with 6 live cells.
pub fn beehive() -> Pattern {
    Pattern::from_rows(&[[0, 1, 1, 0], [1, 0, 0, 1], [0, 1, 1, 0]])
}

/// Period-2 oscillator (2x4).
pub fn toad() -> Pattern {
    Pattern::from_rows(&[[0, 1, 1, 1], [1, 1, 1, 0]])
}

/// South-east travelling spaceship: moves one cell down and one right
/// every 4 generations.
pub fn glider() -> Pattern {
    Pattern::from_rows(&[[0, 1, 0], [0, 0, 1], [1, 1, 1]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populations() {
        assert_eq!(blinker().population(), 3);
        assert_eq!(block().population(), 4);
        assert_eq!(beehive().population(), 6);
        assert_eq!(toad().population(), 6);
        assert_eq!(glider().population(), 5);
    }
}
