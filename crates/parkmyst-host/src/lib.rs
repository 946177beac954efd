//! Parkmyst host — runs one game graph behind a line-delimited JSON
//! transport.
//!
//! Participant events arrive on stdin, one JSON [`Event`] per line; feed
//! changes leave on stdout, one JSON object per line. Logs go to stderr.
//!
//! [`Event`]: parkmyst_core::event::Event

pub mod config;
pub mod error;
pub mod loader;
pub mod transport;
