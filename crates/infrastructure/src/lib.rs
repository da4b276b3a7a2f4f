//! Eavesdrop Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus settings loading, XML
//! document reading and report rendering.

pub mod adapters;
pub mod report;
pub mod serialization;
pub mod settings;
pub mod testing;
pub mod xml;

pub use adapters::ReqwestHttpClient;
pub use report::{render, render_text};
pub use serialization::{SerializationError, from_json, to_json_stable};
pub use settings::{SettingsError, SettingsLoader};
pub use testing::TestRunner;
pub use xml::{XmlDocument, XmlElement, XmlError};
