//! Admin dashboard controllers.
//!
//! Each manager keeps a local copy of the list it edits and re-fetches after every write. There is
//! no shared cache between them.

mod events;
mod team;

pub use events::*;
pub use team::*;
