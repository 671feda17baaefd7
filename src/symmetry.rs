use std::fmt::Debug;

use rand::distributions::Distribution;
use rand::seq::SliceRandom;
use rand::Rng;

/// A symmetry group of the grid. An instance of this group maps a grid and its columns such that
/// the legality of moves and the outcome of the game are invariant under this mapping.
/// The [Default] value is the identity element.
pub trait Symmetry: 'static + Default + Debug + Copy + Clone + Eq + PartialEq + Send + Sync {
    fn all() -> &'static [Self];
    fn inverse(self) -> Self;
}

#[derive(Debug)]
pub struct SymmetryDistribution;

impl<S: Symmetry + Sized> Distribution<S> for SymmetryDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> S {
        *S::all().choose(rng).expect("A symmetry group cannot be empty")
    }
}

/// The D1 symmetry group, a single left/right mirror, resulting in 2 elements.
/// Gravity rules out any other symmetry of a column-drop grid.
///
/// The `Default::default()` value means no transformation.
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub struct D1Symmetry {
    pub mirror: bool,
}

impl D1Symmetry {
    pub const fn new(mirror: bool) -> Self {
        D1Symmetry { mirror }
    }

    /// Map the index `x` along an axis of length `size`.
    pub fn map_axis(self, x: usize, size: usize) -> usize {
        assert!(x < size, "index {} out of bounds for axis of size {}", x, size);
        if self.mirror {
            size - 1 - x
        } else {
            x
        }
    }
}

impl Symmetry for D1Symmetry {
    fn all() -> &'static [Self] {
        const ALL: [D1Symmetry; 2] = [D1Symmetry::new(false), D1Symmetry::new(true)];
        &ALL
    }

    fn inverse(self) -> Self {
        self
    }
}
