//! Rule sets and the catalog the engine cycles through

use super::Seeder;
use crate::error::EngineError;
use itertools::Itertools;
use std::fmt;

/// Length of the born/survive tables. Index 9 is padding and never consulted.
pub const TABLE_LEN: usize = 10;

/// Lifetime of a classic two-state rule set (states 0 and 1 only).
pub const DEFAULT_LIFETIME: u8 = 2;

/// Largest neighbor count a Moore neighborhood can produce.
pub const MAX_NEIGHBORS: u8 = 8;

/// Immutable description of an automaton variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    name: String,
    born: [bool; TABLE_LEN],
    survive: [bool; TABLE_LEN],
    lifetime: u8,
}

impl RuleSet {
    /// Create a two-state rule set from explicit born/survive tables
    pub fn new(
        name: impl Into<String>,
        born: [bool; TABLE_LEN],
        survive: [bool; TABLE_LEN],
    ) -> Self {
        Self {
            name: name.into(),
            born,
            survive,
            lifetime: DEFAULT_LIFETIME,
        }
    }

    /// Build a rule set from the neighbor counts that trigger birth and survival
    pub fn from_counts(
        name: impl Into<String>,
        born: &[u8],
        survive: &[u8],
        lifetime: u32,
    ) -> Result<Self, EngineError> {
        Self::new(name, table(born)?, table(survive)?).with_lifetime(lifetime)
    }

    /// Replace the lifetime; values outside `2..=255` are rejected
    pub fn with_lifetime(mut self, lifetime: u32) -> Result<Self, EngineError> {
        self.lifetime = u8::try_from(lifetime)
            .ok()
            .filter(|&l| l >= DEFAULT_LIFETIME)
            .ok_or(EngineError::InvalidLifetime(lifetime))?;
        Ok(self)
    }

    /// Replace the display name, keeping the tables
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Parse `B<digits>S<digits>[G<lifetime>]` notation, e.g. `B3S23` or `B234S2G5`.
    ///
    /// The parsed rule set is named by its canonical notation.
    pub fn from_notation(notation: &str) -> Result<Self, EngineError> {
        let invalid = || EngineError::InvalidNotation(notation.to_string());
        let upper = notation.trim().to_ascii_uppercase();

        let rest = upper.strip_prefix('B').ok_or_else(invalid)?;
        let (born_digits, rest) = rest.split_once('S').ok_or_else(invalid)?;
        let (survive_digits, lifetime) = match rest.split_once('G') {
            Some((digits, lifetime)) => {
                let lifetime: u32 = lifetime.parse().map_err(|_| invalid())?;
                (digits, lifetime)
            }
            None => (rest, u32::from(DEFAULT_LIFETIME)),
        };

        let born = parse_counts(born_digits).ok_or_else(invalid)?;
        let survive = parse_counts(survive_digits).ok_or_else(invalid)?;

        let rule_set = Self::from_counts("", &born, &survive, lifetime)?;
        let name = rule_set.notation();
        Ok(rule_set.renamed(name))
    }

    /// Canonical `B/S/G` notation; the `G` part is omitted for two-state rules
    pub fn notation(&self) -> String {
        let born = counts(&self.born).join("");
        let survive = counts(&self.survive).join("");
        if self.lifetime == DEFAULT_LIFETIME {
            format!("B{}S{}", born, survive)
        } else {
            format!("B{}S{}G{}", born, survive, self.lifetime)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lifetime(&self) -> u8 {
        self.lifetime
    }

    pub fn born_table(&self) -> &[bool; TABLE_LEN] {
        &self.born
    }

    /// Whether a dead cell with `neighbors` live neighbors is born
    #[inline]
    pub fn is_born(&self, neighbors: u8) -> bool {
        self.born.get(usize::from(neighbors)).copied().unwrap_or(false)
    }

    /// Whether a live cell with `neighbors` live neighbors survives
    #[inline]
    pub fn survives(&self, neighbors: u8) -> bool {
        self.survive.get(usize::from(neighbors)).copied().unwrap_or(false)
    }

    /// True when the rule set has decaying states beyond plain alive
    pub fn has_decay(&self) -> bool {
        self.lifetime > DEFAULT_LIFETIME
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn table(neighbor_counts: &[u8]) -> Result<[bool; TABLE_LEN], EngineError> {
    let mut table = [false; TABLE_LEN];
    for &n in neighbor_counts {
        if n > MAX_NEIGHBORS {
            return Err(EngineError::InvalidNotation(format!(
                "neighbor count {} exceeds {}",
                n, MAX_NEIGHBORS
            )));
        }
        table[usize::from(n)] = true;
    }
    Ok(table)
}

fn counts(table: &[bool; TABLE_LEN]) -> impl Iterator<Item = usize> + '_ {
    table
        .iter()
        .take(usize::from(MAX_NEIGHBORS) + 1)
        .positions(|&set| set)
}

fn parse_counts(digits: &str) -> Option<Vec<u8>> {
    digits
        .chars()
        .map(|ch| ch.to_digit(10).and_then(|d| u8::try_from(d).ok()))
        .collect()
}

/// A rule set paired with the seeding strategy used whenever it is selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub rule_set: RuleSet,
    pub seeder: Seeder,
}

/// Ordered, non-empty sequence of rule sets; navigation wraps around
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog, validating every seeder
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, EngineError> {
        if entries.is_empty() {
            return Err(EngineError::EmptyCatalog);
        }
        for entry in &entries {
            entry.seeder.validate()?;
        }
        Ok(Self { entries })
    }

    /// The seven built-in variants
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|&(name, born, survive, lifetime, seeder)| CatalogEntry {
                rule_set: RuleSet {
                    name: name.to_string(),
                    born: builtin_table(born),
                    survive: builtin_table(survive),
                    lifetime,
                },
                seeder,
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries; construction rejects that case
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rule set at `index`, taken modulo the catalog length
    pub fn get(&self, index: usize) -> &RuleSet {
        &self.entries[index % self.len()].rule_set
    }

    /// Checked lookup of the full entry
    pub fn entry(&self, index: usize) -> Result<&CatalogEntry, EngineError> {
        self.entries.get(index).ok_or(EngineError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Seeding strategy paired with the rule set at `index` (modulo length)
    pub fn seeder(&self, index: usize) -> Seeder {
        self.entries[index % self.len()].seeder
    }

    /// The following rule set; the last index wraps to 0
    pub fn next(&self, index: usize) -> (&RuleSet, usize) {
        let next = (index % self.len() + 1) % self.len();
        (self.get(next), next)
    }

    /// The preceding rule set; index 0 wraps to the last index
    pub fn prev(&self, index: usize) -> (&RuleSet, usize) {
        let index = index % self.len();
        let prev = if index == 0 { self.len() - 1 } else { index - 1 };
        (self.get(prev), prev)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

type BuiltinEntry = (&'static str, &'static [u8], &'static [u8], u8, Seeder);

const BUILTIN: [BuiltinEntry; 7] = [
    ("B3S23", &[3], &[2, 3], 2, Seeder::UniformRandom { probability: 30 }),
    ("B1S012345678", &[1], &[0, 1, 2, 3, 4, 5, 6, 7, 8], 2, Seeder::SingleSeed),
    (
        "B3S12345",
        &[3],
        &[1, 2, 3, 4, 5],
        2,
        Seeder::BoundedRandomBlock { probability: 30, size: 10 },
    ),
    ("B35678S5678", &[3, 5, 6, 7, 8], &[5, 6, 7, 8], 2, Seeder::UniformRandom { probability: 50 }),
    ("B2S0345G10", &[2], &[0, 3, 4, 5], 10, Seeder::BoundedSolidBlock { size: 2 }),
    ("B34S1234G48", &[3, 4], &[1, 2, 3, 4], 48, Seeder::BoundedSolidBlock { size: 3 }),
    ("B234S2G5", &[2, 3, 4], &[2], 5, Seeder::UniformRandom { probability: 10 }),
];

fn builtin_table(neighbor_counts: &[u8]) -> [bool; TABLE_LEN] {
    let mut table = [false; TABLE_LEN];
    for &n in neighbor_counts {
        table[usize::from(n)] = true;
    }
    table
}
