//! **labyrinth** generates randomly blocked grids and finds routes through them with a family of
//! generic graph searches.

pub mod cells;
pub mod frontiers;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_iterators;
pub mod masks;
pub mod pathing;
pub mod search_state;
pub mod units;
mod utils;
