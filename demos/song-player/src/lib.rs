//! Terminal song player built on a dux store
//!
//! - `action`: what the player can be asked to do
//! - `state` / `reducer`: the store's state and the pure functions that evolve it
//! - `library`: the songs to load
//! - `ui`: listeners, view models and rendering

pub mod action;
pub mod library;
pub mod reducer;
pub mod state;
pub mod ui;
