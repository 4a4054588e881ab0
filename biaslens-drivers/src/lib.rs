//! Browser automation used to capture rendered article pages.
//!
//! - [`browser::driver::BiasLensDriver`]: WebDriver session wrapper
//! - [`browser::page::BiasLensPage`]: navigation and page-source helpers
pub mod browser;

pub use browser::driver::{BiasLensDriver, DriverOptions};
pub use browser::page::BiasLensPage;
