//! HTTP surface for the gift quiz: questions, recommendations, shareable
//! landing pages, sitemap and the catalog ranking function.

pub mod api;
pub mod bootstrap;
pub mod health;
pub mod logging;
pub mod state;

use axum::Router;

pub use bootstrap::{bootstrap, bootstrap_with_config, Application, BootstrapError};
pub use state::AppState;

pub fn router(state: AppState) -> Router {
    api::router(state.clone()).merge(health::router(state))
}
