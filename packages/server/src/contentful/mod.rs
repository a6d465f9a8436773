//! Headless CMS access: wire shapes, HTTP client and entry decoding.

pub mod client;
pub mod entries;
pub mod error;
pub mod mapping;

pub use client::{ClientFactory, CmsClient, ContentMode, EntrySource, SourceProvider};
pub use entries::{EntryCollection, EntryQuery, RawEntry};
pub use error::{CmsError, DecodeError};
pub use mapping::{FromEntry, decode_all, slug_value};
