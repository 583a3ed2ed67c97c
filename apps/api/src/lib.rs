//! Backend for the firm's marketing site.
//!
//! - `rotation`: hero text and testimonial carousels.
//! - `engagement`: page view, scroll depth, active time and copy tracking.
//! - `relay` / `apply`: the two API routes served by the `site-api` binary.

pub mod apply;
pub mod config;
pub mod debounce;
pub mod engagement;
pub mod errors;
pub mod relay;
pub mod rotation;
pub mod routes;
pub mod signals;
pub mod state;
