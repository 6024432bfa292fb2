//! Tailor session companion: restores the tailoring page's session, keeps it
//! written through to local storage and fans out resume analysis.
//!
//! The `tailor-session` binary serves these modules over HTTP. `scroll` has no
//! route of its own; frontends and headless hosts embed it directly and bind
//! their panels through `scroll::ScrollSurface`.

pub mod backend;
pub mod config;
pub mod errors;
pub mod models;
pub mod routes;
pub mod scroll;
pub mod session;
pub mod state;
pub mod storage;
