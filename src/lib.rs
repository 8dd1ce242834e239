//! Exploration of the state space of graph puzzles
//!
//! A [`Puzzle`] is explored into a [`StateGraph`] of every reachable state,
//! which a [`LayoutSolver`] arranges in the plane
//! and a [`PlaySession`] walks through by hand.

pub mod explorer;
pub mod format;
pub mod layout;
pub mod puzzle;
pub mod session;
pub mod state;
pub mod transitions;

pub use explorer::{run_state_explorer, ExplorerOptions, StateGraph};
pub use format::parse_puzzle;
pub use layout::{LayoutOptions, LayoutSolver};
pub use puzzle::Puzzle;
pub use session::PlaySession;
pub use state::PuzzleState;
