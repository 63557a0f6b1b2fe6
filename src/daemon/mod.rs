//! Control socket daemon
//!
//! Hosts the monitor loop, answers status queries, applies settings at
//! runtime and pushes status-change events to subscribers over a Unix
//! domain socket.

mod client;
mod protocol;
mod server;

pub use client::DaemonClient;
pub use protocol::{read_message, write_message, Request, Response};
pub use server::{DaemonServer, DaemonStatus};
