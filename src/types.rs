//! Data model for the Dropbox API v2 surface this client uses.
//!
//! Wire-level DTOs mirror the JSON the API actually sends; the public
//! [`Metadata`] union is the closed file-or-folder view callers branch
//! on exhaustively.

use crate::error::{RestError, RestResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Public metadata union
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Metadata for a stored file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Leaf name, original casing.
    pub name: String,
    /// Normalized absolute path, case-folded by the API.
    pub path_lower: String,
    /// Size in bytes.
    pub size: u64,
    /// When the server last wrote the file.
    pub server_modified: Option<DateTime<Utc>>,
}

/// Metadata for a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderMetadata {
    pub name: String,
    pub path_lower: String,
}

/// A file-or-folder entry as returned by metadata and listing calls.
///
/// The API models this as a `.tag`-discriminated union of exactly these
/// two shapes, so callers can and should match both variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Metadata {
    File(FileMetadata),
    Folder(FolderMetadata),
}

impl Metadata {
    pub fn name(&self) -> &str {
        match self {
            Metadata::File(f) => &f.name,
            Metadata::Folder(f) => &f.name,
        }
    }

    pub fn path_lower(&self) -> &str {
        match self {
            Metadata::File(f) => &f.path_lower,
            Metadata::Folder(f) => &f.path_lower,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Metadata::Folder(_))
    }

    /// Server-modified timestamp; folders never carry one.
    pub fn server_modified(&self) -> Option<DateTime<Utc>> {
        match self {
            Metadata::File(f) => f.server_modified,
            Metadata::Folder(_) => None,
        }
    }
}

/// The complete contents of one folder, after all listing pages have
/// been drained. Entry order is the API's listing order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderContent {
    pub entries: Vec<Metadata>,
}

impl FolderContent {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Only the file entries. Pruning branches on this view, since
    /// folders carry no server-modified timestamp.
    pub fn files(&self) -> impl Iterator<Item = &FileMetadata> {
        self.entries.iter().filter_map(|m| match m {
            Metadata::File(f) => Some(f),
            Metadata::Folder(_) => None,
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Wire DTOs
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A `.tag`-discriminated entry from `get_metadata`, `list_folder` or
/// `delete_v2`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEntry {
    #[serde(rename = ".tag")]
    pub tag: String,
    pub name: String,
    #[serde(default)]
    pub path_lower: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub server_modified: Option<DateTime<Utc>>,
}

impl RawEntry {
    /// Lift the raw union into the typed one. Entries that are neither
    /// file nor folder (e.g. `deleted`) are a protocol error here, since
    /// this client never requests deleted entries.
    pub fn into_metadata(self) -> RestResult<Metadata> {
        let path_lower = self
            .path_lower
            .unwrap_or_else(|| crate::path::path_lower(&self.name));
        match self.tag.as_str() {
            "file" => Ok(Metadata::File(FileMetadata {
                name: self.name,
                path_lower,
                size: self.size.unwrap_or(0),
                server_modified: self.server_modified,
            })),
            "folder" => Ok(Metadata::Folder(FolderMetadata {
                name: self.name,
                path_lower,
            })),
            other => Err(RestError::protocol(format!(
                "Unexpected metadata tag '{other}' for '{}'",
                self.name
            ))),
        }
    }
}

/// A file entry without the `.tag` discriminant, as returned by the
/// upload and upload-session-finish routes.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFileEntry {
    pub name: String,
    #[serde(default)]
    pub path_lower: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub server_modified: Option<DateTime<Utc>>,
}

impl From<RawFileEntry> for FileMetadata {
    fn from(raw: RawFileEntry) -> Self {
        let path_lower = raw
            .path_lower
            .unwrap_or_else(|| crate::path::path_lower(&raw.name));
        FileMetadata {
            name: raw.name,
            path_lower,
            size: raw.size.unwrap_or(0),
            server_modified: raw.server_modified,
        }
    }
}

/// Response of `create_folder_v2` (folder metadata, no `.tag`).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFolderResult {
    pub metadata: RawFolderEntry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFolderEntry {
    pub name: String,
    #[serde(default)]
    pub path_lower: Option<String>,
}

impl From<RawFolderEntry> for FolderMetadata {
    fn from(raw: RawFolderEntry) -> Self {
        let path_lower = raw
            .path_lower
            .unwrap_or_else(|| crate::path::path_lower(&raw.name));
        FolderMetadata {
            name: raw.name,
            path_lower,
        }
    }
}

/// Response of `delete_v2`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteResult {
    pub metadata: RawEntry,
}

/// One page of a folder listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ListFolderPage {
    pub entries: Vec<RawEntry>,
    pub cursor: String,
    pub has_more: bool,
}

/// Response of `upload_session/start`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSessionStartResult {
    pub session_id: String,
}

/// Minimal account info from `users/get_current_account`, used only to
/// validate the token on connect.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentAccount {
    pub account_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Token response from `/oauth2/token`.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
}
