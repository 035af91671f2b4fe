//! Built-in metadata extractors.
//!
//! Small, generally useful plugins that ship with the crate. Each one is an
//! ordinary [`MetadataExtractor`](crate::plugins::MetadataExtractor); none
//! are registered automatically.

mod digest;
mod file_stat;
mod mime;

pub use digest::DigestExtractor;
pub use file_stat::FileStatExtractor;
pub use mime::MimeExtractor;
