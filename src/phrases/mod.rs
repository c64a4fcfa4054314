//! Phrase search: finding the sentences currently spelled on the grid.
//!
//! - [`search`]: pure grid walk producing a [`SearchResult`]
//! - [`Phrase`]: one sentence, compared by its words
//! - [`DirectionGrid`]: per-cell reading directions for renderers
//!
//! ## Example Usage
//!
//! ```
//! use hex_rules::core::{EngineConfig, HexPos, TextType, World};
//! use hex_rules::phrases::search;
//!
//! let mut world = World::new(4, 2);
//! world.place_word(TextType::Wall, HexPos::new(0, 0)).unwrap();
//! world.place_word(TextType::Is, HexPos::new(1, 0)).unwrap();
//! world.place_word(TextType::Stop, HexPos::new(2, 0)).unwrap();
//!
//! let result = search(&world, &EngineConfig::default());
//! assert_eq!(result.len(), 1);
//! assert_eq!(result.phrases[0].to_string(), "WALL IS STOP");
//! ```

mod direction;
mod phrase;
mod search;

pub use direction::{DirectionGrid, DirectionMark, PhraseRole};
pub use phrase::{Phrase, PhraseId, PhraseText, PhraseWord, WordRole};
pub use search::{search, SearchResult};
