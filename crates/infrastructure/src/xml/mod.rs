//! XML response documents.
//!
//! The service answers with small documents such as
//! `<project id="3"><name>solum</name>...</project>`. They are read into a
//! tree of [`XmlElement`]s so assertions can address the root, its
//! attributes and `/`-separated child paths.

mod document;

pub use document::{XmlDocument, XmlElement, XmlError};
