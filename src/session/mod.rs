//! Session-space discovery and typed views
//!
//! The heart of the analyzer: deduplicating session identifiers across the
//! process stream, anchoring each distinct session to a translatable
//! process, and exposing the typed view over the session object.

mod locator;
mod space;

pub use locator::{SessionNotFound, SessionSpaceLocator, SessionSpaces};
pub use space::{ImageRecord, ProfileSessionFactory, SessionSpace, SessionSpaceFactory};
