//! HTTP API: routing and request/response mapping over the simulation manager.

pub mod app;
