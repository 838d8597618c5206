//! Force-directed layout and interactive rendering for codebase dependency graphs.
//!
//! The pipeline runs leaf-first: [`source`] reads the analyzer payload,
//! [`projection`] reduces it to a file or symbol view, [`filter`] applies
//! search and the visible cap, [`model::DependencyGraph`] indexes the result,
//! [`layout`] places it, and [`canvas::GraphCanvas`] draws it with [`render`]
//! while [`interaction`] drives the [`camera`].

pub mod camera;
pub mod canvas;
pub mod config;
pub mod error;
pub mod filter;
pub mod impact;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod projection;
pub mod render;
pub mod source;
pub mod util;
pub mod view_state;
