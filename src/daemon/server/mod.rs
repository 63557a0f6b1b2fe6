//! Daemon server: socket lifecycle, client handling and the watcher thread.

mod client;
mod core;
mod lifecycle;
mod watcher;

#[cfg(test)]
mod tests;

pub use core::{DaemonServer, DaemonStatus};
pub(crate) use watcher::SubscriberSink;
