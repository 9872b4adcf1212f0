//! Lifecycle states of a single page fetch
//!
//! Every URL dispatched by the crawl loop moves through [`FetchState`] from
//! `Queued` to `Done`. The fetch task logs each transition at trace level.

mod fetch_state;

pub use fetch_state::FetchState;
