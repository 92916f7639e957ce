//! Entity recognizers
//!
//! - `HttpRecognizer`: remote NER service speaking JSON over HTTP
//! - `DisabledRecognizer`: finds nothing, leaving only pattern detection

pub mod disabled;
pub mod http;

pub use disabled::DisabledRecognizer;
pub use http::HttpRecognizer;
