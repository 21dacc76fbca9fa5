//! HTTP server wiring: shared state and the router.

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
