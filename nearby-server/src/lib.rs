//! Nearby place finder server.
//!
//! A web application that answers: "which car parks (or homes, or
//! buildings) can I drive to from here within N minutes?"

pub mod cache;
pub mod domain;
pub mod export;
pub mod maps;
pub mod pipeline;
pub mod web;
