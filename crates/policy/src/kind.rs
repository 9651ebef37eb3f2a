use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::policies::{DecisionPolicy, GenrePreferencePolicy, GreedyPolicy, MostStockedPolicy, RandomPolicy};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("genre_preference policy requires a preferred genre")]
    MissingGenre,
}

/// Configurable choice of customer policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    Random,
    Greedy,
    GenrePreference,
    MostStocked,
}

impl PolicyKind {
    pub fn build(self, preferred_genre: Option<&str>) -> Result<Box<dyn DecisionPolicy>, PolicyError> {
        Ok(match self {
            PolicyKind::Random => Box::new(RandomPolicy),
            PolicyKind::Greedy => Box::new(GreedyPolicy),
            PolicyKind::MostStocked => Box::new(MostStockedPolicy),
            PolicyKind::GenrePreference => {
                let genre = preferred_genre
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .ok_or(PolicyError::MissingGenre)?;
                Box::new(GenrePreferencePolicy::new(genre))
            }
        })
    }
}
