//! World module - chunk-streamed infinite maze
//!
//! The maze has no persistent map. Fixed-size chunks are generated as
//! the player approaches and destroyed as they recede; each chunk owns
//! its randomized walls and at most one collectible fragment, and is
//! responsible for unregistering both when it is evicted.

mod chunk;
mod streamer;

pub use chunk::*;
pub use streamer::*;
