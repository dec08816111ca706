//! OSC Listen: Open Sound Control console monitor
//!
//! A library for listening on one or more UDP ports, echoing every
//! received OSC message, and stopping on the `/osclisten/exit` command.

pub mod announce;
pub mod config;
pub mod osc;
