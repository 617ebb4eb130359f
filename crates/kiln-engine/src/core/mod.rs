//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop)
//! and the application binary: one-time setup against the GPU context and
//! window event hooks.

mod app;

pub use app::{App, AppControl};
