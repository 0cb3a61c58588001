//! Query a captured recursive directory listing without touching the real
//! filesystem.
//!
//! A listing is parsed once into an immutable [`filesystem::Tree`]. Queries
//! written in a small find-style language ([`query`]) are then evaluated over
//! it in depth-first or breadth-first order ([`search`]).

#![allow(clippy::enum_variant_names)]

pub mod application;
pub mod cli;
pub mod filesystem;
pub mod query;
pub mod search;
pub mod session;
