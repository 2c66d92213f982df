//! Themes state for Calypso: actions, reducers, selectors and persistence.
//!
//! [`ThemesState`] combines per-site theme stores (see [`calypso_query`])
//! with request bookkeeping and the active theme of each site. Feed it
//! [`ThemesAction`]s with [`ThemesState::reduce`], read it through the
//! selector methods, and persist it with [`ThemesState::serialize`].

mod action;
pub mod config;
mod error;
mod reducers;
mod schema;
mod selectors;
mod state;

pub use action::ThemesAction;
pub use config::ThemesConfig;
pub use error::{Result, StateError};
pub use schema::ACTIVE_THEMES_SCHEMA;
pub use state::ThemesState;
