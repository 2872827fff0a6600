//! Common utilities for the Koala CSS core.
//!
//! This crate provides shared infrastructure used by the CSS and DOM crates:
//! - **Warning System** - deduplicated warnings routed through the `log` facade
//! - **URL Resolution** - relative reference resolution against a base URL
//! - **Networking** - the asynchronous resource loader used for `@import`

pub mod net;
pub mod url;
pub mod warning;
