//! PressureLog application
//!
//! Web interface, background sampling tasks and command line front end
//! around `pressurelog-core`.

pub mod commands;
pub mod pages;
pub mod state;
pub mod tasks;
pub mod web;

/// Build identifier stamped by the build script (`YYYY.MM.DD+g<sha>`)
pub const BUILD_ID: &str = env!("PRESSURELOG_BUILD_ID");

/// Version string shown by `--version`
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("PRESSURELOG_BUILD_ID"),
    ")"
);
