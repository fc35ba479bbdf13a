//! Reactive view-model store for a movie search UI.
//!
//! - [`store`]: generic store engine with computed fields, plugins and
//!   subscriptions
//! - [`movies`]: movie domain, actions and the stream adapter
//! - [`ui`]: MVI traits and the movie view-model

pub mod config;
pub mod logging;
pub mod movies;
pub mod store;
pub mod ui;
