//! Initial-state strategies, one per catalog entry

use super::Grid;
use crate::error::EngineError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a freshly selected rule set fills its grid.
///
/// Seeding only ever writes states 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Seeder {
    /// Every cell alive independently with `probability`%
    UniformRandom { probability: u8 },
    /// Only the cell nearest the center is alive
    SingleSeed,
    /// A centered `size`×`size` square filled at `probability`%
    BoundedRandomBlock { probability: u8, size: usize },
    /// A centered `size`×`size` square, fully alive
    BoundedSolidBlock { size: usize },
}

impl Seeder {
    pub fn validate(&self) -> Result<(), EngineError> {
        match *self {
            Seeder::UniformRandom { probability } if probability > 100 => {
                Err(EngineError::InvalidProbability(probability))
            }
            Seeder::BoundedRandomBlock { probability, .. } if probability > 100 => {
                Err(EngineError::InvalidProbability(probability))
            }
            Seeder::BoundedRandomBlock { size: 0, .. } | Seeder::BoundedSolidBlock { size: 0 } => {
                Err(EngineError::InvalidBlockSize)
            }
            _ => Ok(()),
        }
    }

    /// Clear `grid` and write this strategy's initial live cells
    pub fn seed<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) {
        grid.clear();
        if grid.is_empty() {
            return;
        }

        match *self {
            Seeder::UniformRandom { probability } => {
                for state in grid.states_mut() {
                    *state = roll(rng, probability);
                }
            }
            Seeder::SingleSeed => {
                let x = (grid.width() - 1) / 2;
                let y = (grid.height() - 1) / 2;
                grid.put(x, y, 1);
            }
            Seeder::BoundedRandomBlock { probability, size } => {
                for (x, y) in centered_block(grid, size) {
                    grid.put(x, y, roll(rng, probability));
                }
            }
            Seeder::BoundedSolidBlock { size } => {
                for (x, y) in centered_block(grid, size) {
                    grid.put(x, y, 1);
                }
            }
        }
    }
}

impl fmt::Display for Seeder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seeder::UniformRandom { probability } => write!(f, "uniform-random({}%)", probability),
            Seeder::SingleSeed => write!(f, "single-seed"),
            Seeder::BoundedRandomBlock { probability, size } => {
                write!(f, "bounded-random-block({}%, {}x{})", probability, size, size)
            }
            Seeder::BoundedSolidBlock { size } => {
                write!(f, "bounded-solid-block({}x{})", size, size)
            }
        }
    }
}

#[inline]
fn roll<R: Rng + ?Sized>(rng: &mut R, probability: u8) -> u8 {
    u8::from(rng.gen_range(0..100u8) < probability)
}

/// Coordinates of a `size`×`size` square centered in the grid, clamped to
/// the grid's shorter side.
fn centered_block(grid: &Grid, size: usize) -> impl Iterator<Item = (usize, usize)> {
    let side = size.min(grid.width().min(grid.height()));
    let x0 = (grid.width() - side) / 2;
    let y0 = (grid.height() - side) / 2;
    (y0..y0 + side).flat_map(move |y| (x0..x0 + side).map(move |x| (x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn alive_cells(grid: &Grid) -> Vec<(usize, usize)> {
        grid.living_cells()
    }

    #[test]
    fn test_solid_block_on_10x10() {
        let mut grid = Grid::new(10, 10);
        let mut rng = StdRng::seed_from_u64(1);
        Seeder::BoundedSolidBlock { size: 3 }.seed(&mut grid, &mut rng);

        let mut expected = Vec::new();
        for y in 3..6 {
            for x in 3..6 {
                expected.push((x, y));
            }
        }
        assert_eq!(alive_cells(&grid), expected);
        assert_eq!(grid.alive_count(), 9);
        assert_eq!(grid.states().iter().filter(|&&s| s == 0).count(), 91);
    }

    #[test]
    fn test_block_clamps_to_small_grid() {
        let mut grid = Grid::new(4, 2);
        let mut rng = StdRng::seed_from_u64(1);
        Seeder::BoundedSolidBlock { size: 10 }.seed(&mut grid, &mut rng);

        // Side clamps to 2, origin ((4-2)/2, 0)
        assert_eq!(alive_cells(&grid), vec![(1, 0), (2, 0), (1, 1), (2, 1)]);
    }

    #[test]
    fn test_random_block_stays_inside_square() {
        let mut grid = Grid::new(30, 20);
        let mut rng = StdRng::seed_from_u64(7);
        Seeder::BoundedRandomBlock { probability: 100, size: 10 }.seed(&mut grid, &mut rng);

        assert_eq!(grid.alive_count(), 100);
        for (x, y) in alive_cells(&grid) {
            assert!((10..20).contains(&x));
            assert!((5..15).contains(&y));
        }
    }

    #[test]
    fn test_single_seed_center() {
        let mut rng = StdRng::seed_from_u64(0);

        let mut grid = Grid::new(9, 9);
        Seeder::SingleSeed.seed(&mut grid, &mut rng);
        assert_eq!(alive_cells(&grid), vec![(4, 4)]);

        let mut grid = Grid::new(10, 6);
        Seeder::SingleSeed.seed(&mut grid, &mut rng);
        assert_eq!(alive_cells(&grid), vec![(4, 2)]);
    }

    #[test]
    fn test_uniform_random_extremes() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut grid = Grid::new(16, 16);

        Seeder::UniformRandom { probability: 100 }.seed(&mut grid, &mut rng);
        assert_eq!(grid.alive_count(), 256);

        Seeder::UniformRandom { probability: 0 }.seed(&mut grid, &mut rng);
        assert_eq!(grid.alive_count(), 0);
    }

    #[test]
    fn test_uniform_random_density() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut grid = Grid::new(100, 100);
        Seeder::UniformRandom { probability: 30 }.seed(&mut grid, &mut rng);

        let alive = grid.alive_count();
        assert!((2500..3500).contains(&alive), "got {} alive cells", alive);
        assert!(grid.states().iter().all(|&s| s <= 1));
    }

    #[test]
    fn test_seed_replaces_previous_state() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut grid = Grid::new(5, 5);
        grid.set(0, 0, 4).unwrap();
        Seeder::SingleSeed.seed(&mut grid, &mut rng);
        assert_eq!(grid.get(0, 0), 0);
        assert_eq!(grid.alive_count(), 1);
    }

    #[test]
    fn test_empty_grid_is_noop() {
        let mut rng = StdRng::seed_from_u64(0);
        for seeder in [
            Seeder::UniformRandom { probability: 50 },
            Seeder::SingleSeed,
            Seeder::BoundedRandomBlock { probability: 30, size: 10 },
            Seeder::BoundedSolidBlock { size: 3 },
        ] {
            let mut grid = Grid::new(0, 5);
            seeder.seed(&mut grid, &mut rng);
            assert!(grid.is_empty());
        }
    }

    #[test]
    fn test_validate() {
        assert!(Seeder::SingleSeed.validate().is_ok());
        assert_eq!(
            Seeder::UniformRandom { probability: 101 }.validate(),
            Err(EngineError::InvalidProbability(101))
        );
        assert_eq!(
            Seeder::BoundedRandomBlock { probability: 30, size: 0 }.validate(),
            Err(EngineError::InvalidBlockSize)
        );
    }

    #[test]
    fn test_yaml_form() {
        let yaml = "kind: bounded_random_block\nprobability: 30\nsize: 10\n";
        let seeder: Seeder = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(seeder, Seeder::BoundedRandomBlock { probability: 30, size: 10 });
        assert_eq!(seeder.to_string(), "bounded-random-block(30%, 10x10)");
    }
}
