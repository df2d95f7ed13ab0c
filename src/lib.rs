//! tilearena - deterministic lockstep core for a two-player tile battle game
//!
//! The crate is split into two halves:
//! - The simulation kernel (`state`, `behaviors`, `input`): a pure,
//!   reproducible tick function. Given the same seed and the same paired
//!   intent streams, every peer computes bit-identical states.
//! - The rollback transport (`net`): committed/dirty state pair, pending
//!   intent rings, fast-forward, and the wire protocol over an ordered
//!   datagram channel.
//!
//! Sprite decoding, rendering, input polling and WebRTC setup are external
//! collaborators; the core only exposes a tickable state and a scene
//! description tree.

pub mod behaviors;
pub mod config;
pub mod input;
pub mod net;
pub mod render;
pub mod state;
pub mod util;

pub use config::Config;
pub use input::{apply_player_intents, Intent};
pub use net::session::{new_arena, Lockstep, Session, SessionError};
pub use net::DataChannel;
pub use render::{Assets, RenderNode};
pub use state::{Direction, Side, State, TilePos, Ticks};
