//! Broadcast dispatch
//!
//! Fan-out of one published line to the subscribers of one topic, with send
//! failures reported back to the registry instead of surfacing to the
//! publisher.

pub mod dispatcher;

pub use dispatcher::Dispatcher;
