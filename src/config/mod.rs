//! Startup Configuration
//!
//! Loads the JSON files each role needs into the immutable objects the core
//! works with. Loading happens once, before serving starts; afterwards
//! nothing in the system reads a file or an environment variable.

pub mod loader;
