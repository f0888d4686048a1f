//! Client for the example service's HTTP surface.

mod client;

pub use client::{Envelope, ExampleClient, ServiceReply};
