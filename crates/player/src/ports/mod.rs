//! Ports - interfaces the application layer depends on.

pub mod outbound;
