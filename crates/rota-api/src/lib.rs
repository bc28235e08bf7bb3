//! JSON REST API for rota.
//!
//! Exposes an axum [`Router`] backed by any
//! [`rota_core::store::ScheduleStore`]. TLS and transport concerns are the
//! caller's responsibility; authentication is HTTP Basic against the users
//! table, resolved per request into a [`rota_core::actor::Actor`].
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rota_api::api_router(state))
//! ```

pub mod auth;
pub mod entities;
pub mod entries;
pub mod error;
pub mod export;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use rota_core::{lifecycle::Scheduler, store::ScheduleStore};

pub use error::ApiError;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all handlers. The scheduler owns the write
/// path; read-side handlers go straight to the store.
#[derive(Clone)]
pub struct AppState<S: ScheduleStore> {
  pub scheduler: Arc<Scheduler<S>>,
  pub store:     Arc<S>,
}

impl<S: ScheduleStore> AppState<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      scheduler: Arc::new(Scheduler::new(store.clone())),
      store,
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: ScheduleStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Schedule entries
    .route("/entries", get(entries::list::<S>).post(entries::create::<S>))
    .route(
      "/entries/{id}",
      get(entries::get_one::<S>)
        .put(entries::update::<S>)
        .delete(entries::delete_one::<S>),
    )
    // CSV export
    .route("/export", get(export::handler::<S>))
    // Dynamic-entity registry
    .route("/entities", get(entities::list::<S>).post(entities::create::<S>))
    .route(
      "/entities/{id}",
      get(entities::get_one::<S>)
        .put(entities::update::<S>)
        .delete(entities::delete_one::<S>),
    )
    // User accounts
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route(
      "/users/{id}",
      get(users::get_one::<S>)
        .put(users::update::<S>)
        .delete(users::delete_one::<S>),
    )
    .route("/users/{id}/reset-password", post(users::reset_password::<S>))
    .with_state(state)
}
