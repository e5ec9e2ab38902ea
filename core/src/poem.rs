//! Poems and the fallback set
//!
//! A [`Poem`] is always exactly [`POEM_LINES`] lines. Remote completions are
//! cut down to that size; anything shorter is rejected so a short poem never
//! reaches the screen.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Number of lines in every poem
pub const POEM_LINES: usize = 4;

/// Poems used when remote generation is unavailable
pub const FALLBACK_POEMS: [[&str; POEM_LINES]; 3] = [
    [
        "Circuits fade to endless night,",
        "Binary dreams take final flight,",
        "In silicon's last dying breath,",
        "Digital echoes welcome death.",
    ],
    [
        "Through quantum mists of time decayed,",
        "Where future's paths are now unmade,",
        "In coded depths of endless space,",
        "Your digital footprints leave no trace.",
    ],
    [
        "Ash rains from the sky,",
        "Shadows creep where hope once lay,",
        "Silence holds the end,",
        "Time dissolves into decay.",
    ],
];

/// A four-line prophecy
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poem {
    lines: [String; POEM_LINES],
}

impl Poem {
    /// Create a poem from exactly four lines
    pub fn new(lines: [String; POEM_LINES]) -> Self {
        Self { lines }
    }

    /// The poem's lines, in order
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Fallback poem by index
    #[must_use]
    pub fn fallback(index: usize) -> Option<Self> {
        FALLBACK_POEMS
            .get(index)
            .map(|lines| Self::new(lines.map(str::to_string)))
    }

    /// The first fallback poem, used when even generation itself breaks
    #[must_use]
    pub fn first_fallback() -> Self {
        Self::new(FALLBACK_POEMS[0].map(str::to_string))
    }

    /// A fallback poem chosen uniformly at random
    #[must_use]
    pub fn random_fallback() -> Self {
        Self::random_fallback_with(&mut rand::thread_rng())
    }

    /// A fallback poem chosen uniformly with the given RNG
    pub fn random_fallback_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let index = rng.gen_range(0..FALLBACK_POEMS.len());
        Self::new(FALLBACK_POEMS[index].map(str::to_string))
    }

    /// Whether this poem is one of the fallback set, verbatim
    pub fn is_fallback(&self) -> bool {
        FALLBACK_POEMS
            .iter()
            .any(|fallback| fallback.iter().zip(&self.lines).all(|(a, b)| a == b))
    }

    /// Build a poem from free-form completion text.
    ///
    /// Blank lines are dropped, the rest are trimmed, and the first four are
    /// kept. Fewer than four usable lines is an error.
    pub fn from_completion(text: &str) -> Result<Self, FetchError> {
        let usable: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(POEM_LINES)
            .map(str::to_string)
            .collect();

        let found = usable.len();
        let lines: [String; POEM_LINES] = usable
            .try_into()
            .map_err(|_| FetchError::TooFewLines { found })?;
        Ok(Self::new(lines))
    }
}
