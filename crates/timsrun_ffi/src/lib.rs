//! Flutter-facing bindings for the TimsRun core.

pub mod api;
