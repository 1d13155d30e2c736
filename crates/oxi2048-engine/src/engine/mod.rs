//! Game engine logic built on the core grid.
//!
//! - [`GameState`] - live game: grid plus tile spawner, reset/update/terminal
//! - [`TileSpawner`] - random tile placement with a seedable RNG
//! - [`SpawnSeed`] - seed for deterministic tile spawning

pub use self::{game_state::*, tile_spawner::*};

mod game_state;
mod tile_spawner;
