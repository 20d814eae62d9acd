//! End-to-end tests driving a protocol client against the loopback provider.

mod session;
