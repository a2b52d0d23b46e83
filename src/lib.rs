//! Typing exam engine: passage scoring, live metrics and the timed session
//! state machine, plus the terminal host built on top of them.

pub mod app;
pub mod certificate;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod passage;
pub mod session;
pub mod store;
pub mod ui;
