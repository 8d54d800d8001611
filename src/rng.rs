//! Shape sources: where the next tetromino comes from.

use crate::piece::ShapeKind;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplies shape-table indices (0..7) for newly spawned pieces.
pub trait ShapeSource {
    fn next_shape_index(&mut self) -> usize;
}

/// Uniform, independent draws over the 7 shapes. No bag, no repeat protection.
#[derive(Debug, Clone)]
pub struct UniformShapes {
    rng: StdRng,
}

impl UniformShapes {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }
}

impl ShapeSource for UniformShapes {
    fn next_shape_index(&mut self) -> usize {
        self.rng.random_range(0..ShapeKind::ALL.len())
    }
}

/// Replays a fixed list of shapes, cycling when exhausted.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct SequenceShapes {
    kinds: Vec<ShapeKind>,
    index: usize,
}

#[cfg(test)]
impl SequenceShapes {
    pub fn new(kinds: Vec<ShapeKind>) -> Self {
        assert!(!kinds.is_empty(), "sequence needs at least one shape");
        Self { kinds, index: 0 }
    }
}

#[cfg(test)]
impl ShapeSource for SequenceShapes {
    fn next_shape_index(&mut self) -> usize {
        let kind = self.kinds[self.index % self.kinds.len()];
        self.index += 1;
        kind as usize
    }
}
