//! Dropbox publishing client.
//!
//! A blocking Dropbox API v2 client built for publish-style workflows:
//! connect with a bearer token, move into a working folder, push build
//! artifacts (chunked when large), and prune what has aged out.
//!
//! # Quick start
//!
//! ```no_run
//! use dropbox_publish::DropboxClient;
//!
//! fn main() -> dropbox_publish::RestResult<()> {
//!     let mut client = DropboxClient::new("ACCESS_TOKEN")?;
//!     client.connect()?;
//!
//!     client.make_directory("releases")?;
//!     client.change_working_directory("releases")?;
//!
//!     let bytes = b"artifact contents".to_vec();
//!     let len = bytes.len() as u64;
//!     let mut reader = std::io::Cursor::new(bytes);
//!     let stored = client.store_file("build.tar.gz", &mut reader, len)?;
//!     println!("stored {} ({} bytes)", stored.path_lower, stored.size);
//!
//!     client.prune_folder("/releases", 30)?;
//!     client.disconnect();
//!     Ok(())
//! }
//! ```

pub mod args;
pub mod auth;
pub mod client;
pub mod error;
pub mod header;
pub mod path;
pub mod request;
pub mod types;
pub mod upload;

#[cfg(test)]
mod testutil;

pub use client::{DropboxClient, DEFAULT_CHUNK_SIZE, MINIMUM_TIMEOUT_MS, TIMEOUT_UNSET};
pub use error::{RestError, RestErrorKind, RestResult};
pub use header::http_header_encode;
pub use types::{FileMetadata, FolderContent, FolderMetadata, Metadata};
pub use upload::{chunk_count, ChunkedUploader, UploadPhase};
