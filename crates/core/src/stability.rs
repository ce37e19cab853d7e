//! Stability engine - structural integrity of the tower
//!
//! Stability starts at 100 and only ever drops on a wrong answer. The penalty
//! is weighted by layer: the foundation carries the most load, so a miss on
//! layer 1 costs [`MAX_PENALTY`] while a miss on the top layer costs 1.
//!
//! All arithmetic is integer with round-half-up, so the same sequence of
//! answers always produces the same stability.

use crate::types::{Outcome, StabilityBand, INITIAL_STABILITY, MAX_PENALTY, TOWER_LAYERS};

/// Integer division rounding halves up (`num / den` for non-negative values)
pub fn div_round_half_up(num: u32, den: u32) -> u32 {
    debug_assert!(den > 0);
    (2 * num + den) / (2 * den)
}

/// Stability lost for a wrong answer on `layer` (1-based)
///
/// Layers outside the tower are clamped into `1..=TOWER_LAYERS`.
pub fn layer_penalty(layer: u8) -> u8 {
    let layer = layer.clamp(1, TOWER_LAYERS) as u32;
    let weight = TOWER_LAYERS as u32 + 1 - layer;
    div_round_half_up(MAX_PENALTY * weight, TOWER_LAYERS as u32) as u8
}

/// Signed stability change for a resolution (0 or negative)
pub fn stability_delta(outcome: Outcome, layer: u8) -> i32 {
    match outcome {
        Outcome::Incorrect => -(layer_penalty(layer) as i32),
        Outcome::Correct | Outcome::TipRead => 0,
    }
}

/// The 0..=100 integrity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Stability(u8);

impl Stability {
    pub fn new() -> Self {
        Self(INITIAL_STABILITY)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn band(&self) -> StabilityBand {
        StabilityBand::from_stability(self.0)
    }

    pub fn is_collapsed(&self) -> bool {
        self.0 == 0
    }

    /// Stability after applying `delta`, floored at 0 and capped at 100
    pub fn after(&self, delta: i32) -> Self {
        let next = (self.0 as i32 + delta).clamp(0, INITIAL_STABILITY as i32);
        Self(next as u8)
    }
}

impl Default for Stability {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(div_round_half_up(5, 2), 3);
        assert_eq!(div_round_half_up(4, 2), 2);
        assert_eq!(div_round_half_up(7, 3), 2);
        assert_eq!(div_round_half_up(0, 9), 0);
    }

    #[test]
    fn test_layer_penalty_table() {
        // 25 * (19 - layer) / 18, rounded half up
        let expected: [u8; 18] = [25, 24, 22, 21, 19, 18, 17, 15, 14, 13, 11, 10, 8, 7, 6, 4, 3, 1];
        for (i, want) in expected.iter().enumerate() {
            assert_eq!(layer_penalty(i as u8 + 1), *want, "layer {}", i + 1);
        }
    }

    #[test]
    fn test_penalty_decreases_upwards() {
        for layer in 1..TOWER_LAYERS {
            assert!(layer_penalty(layer) >= layer_penalty(layer + 1));
        }
        assert!(layer_penalty(1) > layer_penalty(TOWER_LAYERS));
    }

    #[test]
    fn test_penalty_clamps_layer() {
        assert_eq!(layer_penalty(0), layer_penalty(1));
        assert_eq!(layer_penalty(200), layer_penalty(TOWER_LAYERS));
    }

    #[test]
    fn test_delta_only_for_incorrect() {
        assert_eq!(stability_delta(Outcome::Correct, 1), 0);
        assert_eq!(stability_delta(Outcome::TipRead, 1), 0);
        assert_eq!(stability_delta(Outcome::Incorrect, 1), -25);
        assert_eq!(stability_delta(Outcome::Incorrect, 18), -1);
    }

    #[test]
    fn test_stability_floors_at_zero() {
        let s = Stability::new().after(-60).after(-60);
        assert_eq!(s.value(), 0);
        assert!(s.is_collapsed());
        assert_eq!(s.band(), StabilityBand::Collapsed);
    }

    #[test]
    fn test_stability_caps_at_initial() {
        assert_eq!(Stability::new().after(10).value(), INITIAL_STABILITY);
    }

    #[test]
    fn test_four_foundation_misses_collapse() {
        let mut s = Stability::new();
        for _ in 0..4 {
            s = s.after(stability_delta(Outcome::Incorrect, 1));
        }
        assert!(s.is_collapsed());
    }
}
