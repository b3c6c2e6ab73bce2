//! Rubik's Cube Viewer Library
//!
//! Displays cube state served by a puzzle backend: a flat net of the six
//! faces and a 3D model of the 27 pieces, with move playback.

pub mod animation;
pub mod client;
pub mod config;
pub mod cube;
pub mod error;
pub mod geometry;
pub mod net;
pub mod scene;
pub mod session;

pub use animation::{Sequencer, Shown, Ticker};
pub use client::{BackendClient, Dispatcher};
pub use config::AppConfig;
pub use cube::{CubeMove, CubePiece, CubeResponse, CubeState, Side, StickerColor};
pub use error::{CubeViewError, Result};
pub use session::{Request, Session};
