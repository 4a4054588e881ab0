//! Page acquisition and related-coverage lookup.
//!
//! - Page capture trait with browser, HTTP and file implementations (`capture`)
//! - Brave News Search client (`brave`)
//! - Similar-article source trait and result de-duplication (`similar`)

pub mod brave;
pub mod capture;
pub mod similar;

pub use brave::BraveNewsClient;
pub use capture::{BrowserCapturer, FileCapturer, HttpCapturer, PageCapture, PageCapturer};
pub use similar::{SimilarArticle, SimilarArticleSource, dedupe_similar};
