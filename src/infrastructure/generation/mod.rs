//! HTTP adapter for the content-generation service.

mod client;

pub use client::HttpCardGenerator;
