//! The per-game file pool.
//!
//! Every game deals the same ten (size, secrecy) pairs; only the filename
//! assignment varies. Production shuffles the name pool with a time-seeded
//! RNG. Tests either pass a seeded [`StdRng`](rand::rngs::StdRng) to
//! [`Dataset::generate`] or use [`Dataset::in_listed_order`] for the
//! identity assignment.

use exfil_protocol::File;
use rand::Rng;
use rand::seq::SliceRandom;

/// Transfer cost of each file, in KB.
pub const FILE_SIZES: [i64; 10] = [23, 31, 29, 44, 53, 38, 63, 85, 89, 82];

/// Score contribution of each file when delivered to Glenda.
pub const FILE_SECRECY: [i64; 10] = [92, 57, 49, 68, 60, 43, 67, 84, 86, 72];

/// The fixed filename pool.
pub const FILE_NAMES: [&str; 10] = [
    "filename_0",
    "filename_1",
    "filename_2",
    "filename_3",
    "filename_4",
    "filename_5",
    "filename_6",
    "filename_7",
    "filename_8",
    "filename_9",
];

/// Per-player transfer budgets, assigned in admit order.
pub const BANDWIDTH_CAPS: [i64; 3] = [50, 81, 120];

/// The ten files of one game, in deal order.
#[derive(Debug, Clone)]
pub struct Dataset {
    files: Vec<File>,
}

impl Dataset {
    /// Builds the pool with the name assignment shuffled by `rng`.
    pub fn generate(rng: &mut impl Rng) -> Self {
        let mut names = FILE_NAMES;
        names.shuffle(rng);
        Self::with_names(&names)
    }

    /// Builds the pool with names in listed order: `filename_0` gets the
    /// first (size, secrecy) pair, and so on.
    pub fn in_listed_order() -> Self {
        Self::with_names(&FILE_NAMES)
    }

    fn with_names(names: &[&str; 10]) -> Self {
        let files = names
            .iter()
            .zip(FILE_SIZES.iter().zip(FILE_SECRECY.iter()))
            .map(|(name, (&size, &secrecy))| File::new(*name, size, secrecy))
            .collect();
        Self { files }
    }

    pub fn files(&self) -> &[File] {
        &self.files
    }

    /// Deals the pool round-robin across `seats` inventories, in admit
    /// order. Three seats receive 4/3/3 files.
    pub fn deal(self, seats: usize) -> Vec<Vec<File>> {
        let mut hands: Vec<Vec<File>> = (0..seats).map(|_| Vec::new()).collect();
        for (i, file) in self.files.into_iter().enumerate() {
            hands[i % seats].push(file);
        }
        hands
    }
}
