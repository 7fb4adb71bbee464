//! The character catalog: the read-only list of guessable characters.
//!
//! The catalog never changes at runtime. Each room draws secrets from it
//! and each player is shown their own independently shuffled view of it,
//! so neither board order carries information about a secret.

use guesswho_protocol::Character;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::CatalogError;

/// A validated, immutable list of characters.
///
/// Construction guarantees the list is non-empty and that names are
/// unique, so `name` can serve as the character's identity everywhere
/// else (guess resolution compares names only).
#[derive(Debug, Clone)]
pub struct Catalog {
    characters: Vec<Character>,
}

impl Catalog {
    /// Builds a catalog from a character list.
    ///
    /// # Errors
    /// Returns [`CatalogError::Empty`] for an empty list and
    /// [`CatalogError::DuplicateName`] if two entries share a name.
    pub fn new(characters: Vec<Character>) -> Result<Self, CatalogError> {
        if characters.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = std::collections::HashSet::new();
        for character in &characters {
            if !seen.insert(character.name.as_str()) {
                return Err(CatalogError::DuplicateName(
                    character.name.clone(),
                ));
            }
        }
        Ok(Self { characters })
    }

    /// Parses a catalog from a JSON array of `{imageUrl, name}` objects,
    /// the format accepted in the `CHARACTERS` environment variable.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let characters: Vec<Character> = serde_json::from_str(json)?;
        Self::new(characters)
    }

    /// The characters in catalog order.
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// Number of characters in the catalog.
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Whether the catalog has no characters. Construction rejects empty
    /// lists, so this is `false` for any catalog built through [`new`](Self::new).
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Draws one character uniformly at random. Each call is an
    /// independent draw; two players may end up with the same secret.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> Character {
        self.characters
            .choose(rng)
            .cloned()
            .expect("catalog is never empty")
    }

    /// Returns a uniformly shuffled copy of the catalog (Fisher-Yates),
    /// used as one player's board view.
    pub fn shuffled<R: Rng>(&self, rng: &mut R) -> Vec<Character> {
        let mut view = self.characters.clone();
        view.shuffle(rng);
        view
    }
}

/// The built-in catalog, used when no `CHARACTERS` override is supplied.
impl Default for Catalog {
    fn default() -> Self {
        let characters = [
            ("Alice", "https://via.placeholder.com/100?text=Alice"),
            ("Bob", "https://via.placeholder.com/100?text=Bob"),
            ("Charlie", "https://via.placeholder.com/100?text=Charlie"),
            ("Diana", "https://via.placeholder.com/100?text=Diana"),
        ]
        .into_iter()
        .map(|(name, image_url)| Character {
            image_url: image_url.to_string(),
            name: name.to_string(),
        })
        .collect();
        Self::new(characters).expect("default catalog is valid")
    }
}
