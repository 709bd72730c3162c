//! The stateful storage client — connection lifecycle, working-folder
//! context, and the file/folder operations a publish job needs.
//!
//! One instance is one session: operations are blocking and must be
//! called sequentially. Fan-out across transfers means one client per
//! worker, not shared instances.

use crate::args;
use crate::auth;
use crate::error::RestResult;
use crate::path;
use crate::request::RestClient;
use crate::types::{
    CreateFolderResult, CurrentAccount, DeleteResult, FileMetadata, FolderContent,
    FolderMetadata, ListFolderPage, Metadata, RawFileEntry,
};
use crate::upload::ChunkedUploader;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use log::debug;
use std::io::Read;

/// Sentinel for "no explicit timeout configured".
pub const TIMEOUT_UNSET: i64 = -1;

/// Configured timeouts must be strictly greater than this (ms); smaller
/// values are silently ignored. Uploads of large chunks over slow links
/// make short timeouts useless.
pub const MINIMUM_TIMEOUT_MS: i64 = 60_000;

/// Default boundary between single-request and chunked upload.
pub const DEFAULT_CHUNK_SIZE: u64 = 4 * 1024 * 1024;

/// Stateful Dropbox client bound to one access token.
#[derive(Debug)]
pub struct DropboxClient {
    rest: RestClient,
    connected: bool,
    /// Absolute, normalized, case-folded current folder.
    working_folder: String,
    timeout_ms: i64,
    chunk_size: u64,
}

impl DropboxClient {
    /// Create a client from an existing bearer token. No network call.
    pub fn new(access_token: &str) -> RestResult<Self> {
        Ok(Self {
            rest: RestClient::new(access_token)?,
            connected: false,
            working_folder: "/".to_string(),
            timeout_ms: TIMEOUT_UNSET,
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    /// Create a client from an authorization code, exchanging it for an
    /// access token. The exchange happens exactly once, here.
    pub fn from_authorization_code(
        app_key: &str,
        app_secret: &str,
        authorization_code: &str,
    ) -> RestResult<Self> {
        let token = auth::exchange_authorization_code(app_key, app_secret, authorization_code)?;
        Self::new(&token)
    }

    /// Override base URLs (for testing).
    #[cfg(test)]
    fn with_bases(mut self, api: &str, content: &str) -> Self {
        self.rest = self.rest.clone().with_bases(api, content);
        self
    }

    // ── Connection lifecycle ────────────────────────────────────────

    /// Validate the token with a lightweight authenticated call and
    /// mark the client connected. On failure the client stays
    /// disconnected and the error propagates.
    pub fn connect(&mut self) -> RestResult<()> {
        let account: CurrentAccount = self
            .rest
            .rpc("users/get_current_account", &serde_json::Value::Null)?;
        debug!("connected as {}", account.account_id);
        self.connected = true;
        Ok(())
    }

    /// Drop the connection state. Purely local; always succeeds.
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    // ── Configuration ───────────────────────────────────────────────

    /// Set the per-call timeout in milliseconds. Values at or below
    /// [`MINIMUM_TIMEOUT_MS`] are rejected as a no-op, keeping the
    /// previous value.
    pub fn set_timeout(&mut self, ms: i64) {
        if ms <= MINIMUM_TIMEOUT_MS {
            debug!("ignoring timeout {ms} ms (minimum is > {MINIMUM_TIMEOUT_MS} ms)");
            return;
        }
        self.timeout_ms = ms;
        self.rest
            .set_timeout(Some(std::time::Duration::from_millis(ms as u64)));
    }

    /// The configured timeout in milliseconds, or [`TIMEOUT_UNSET`].
    pub fn timeout(&self) -> i64 {
        self.timeout_ms
    }

    /// Set the chunk size that flips `store_file` into chunked mode.
    /// Zero is ignored.
    pub fn set_chunk_size(&mut self, bytes: u64) {
        if bytes > 0 {
            self.chunk_size = bytes;
        }
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    // ── Working folder ──────────────────────────────────────────────

    /// The current folder all relative paths resolve against.
    pub fn working_folder(&self) -> &str {
        &self.working_folder
    }

    /// Change the working folder if `path` names an existing folder.
    ///
    /// Returns `true` and updates the context when the folder exists;
    /// returns `false` (context untouched) when the path is missing or
    /// is a file. Any other failure propagates.
    pub fn change_working_directory(&mut self, path: &str) -> RestResult<bool> {
        let target = path::resolve(&self.working_folder, path);
        match self.retrieve_metadata(&target) {
            Ok(Metadata::Folder(folder)) => {
                self.working_folder = folder.path_lower;
                Ok(true)
            }
            Ok(Metadata::File(_)) => Ok(false),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    // ── Folder operations ───────────────────────────────────────────

    /// Create a folder, resolving `name` against the working folder.
    ///
    /// Creating a folder that already exists is success: the existing
    /// folder's metadata is returned instead of an error.
    pub fn make_directory(&self, name: &str) -> RestResult<FolderMetadata> {
        let target = path::resolve(&self.working_folder, name);
        let created: RestResult<CreateFolderResult> = self
            .rest
            .rpc("files/create_folder_v2", &args::build_create_folder(&target));

        match created {
            Ok(result) => Ok(result.metadata.into()),
            Err(err) if err.is_conflict() => match self.retrieve_metadata(&target)? {
                Metadata::Folder(folder) => Ok(folder),
                // A file squatting on the path is a real conflict.
                Metadata::File(_) => Err(err),
            },
            Err(err) => Err(err),
        }
    }

    /// Tagged metadata for the given path. Missing paths are a
    /// `NotFound` error.
    pub fn retrieve_metadata(&self, absolute_path: &str) -> RestResult<Metadata> {
        let target = path::resolve(&self.working_folder, absolute_path);
        let raw: crate::types::RawEntry = self
            .rest
            .rpc("files/get_metadata", &args::build_get_metadata(&target))?;
        raw.into_metadata()
    }

    /// The complete contents of a folder, following continuation
    /// cursors until the listing is exhausted.
    pub fn list_files_of_folder(&self, folder: &FolderMetadata) -> RestResult<FolderContent> {
        self.list_folder_path(&folder.path_lower)
    }

    fn list_folder_path(&self, folder_path: &str) -> RestResult<FolderContent> {
        let mut page: ListFolderPage = self
            .rest
            .rpc("files/list_folder", &args::build_list_folder(folder_path))?;

        let mut entries = Vec::with_capacity(page.entries.len());
        loop {
            for raw in page.entries {
                entries.push(raw.into_metadata()?);
            }
            if !page.has_more {
                break;
            }
            page = self.rest.rpc(
                "files/list_folder/continue",
                &args::build_list_folder_continue(&page.cursor),
            )?;
        }
        Ok(FolderContent { entries })
    }

    // ── File transfer ───────────────────────────────────────────────

    /// Upload exactly `size` bytes read from `content` to `name`
    /// (resolved against the working folder).
    ///
    /// Payloads above the configured chunk size go through the
    /// upload-session protocol; smaller ones are a single request.
    pub fn store_file<R: Read>(
        &self,
        name: &str,
        content: &mut R,
        size: u64,
    ) -> RestResult<FileMetadata> {
        let dest = path::resolve(&self.working_folder, name);
        if size > self.chunk_size {
            let mut uploader = ChunkedUploader::new(&self.rest, self.chunk_size);
            uploader.upload(content, size, &dest)
        } else {
            let mut buf = vec![0u8; size as usize];
            content.read_exact(&mut buf)?;
            let raw: RawFileEntry =
                self.rest
                    .content_upload("files/upload", &args::build_upload_arg(&dest), buf)?;
            Ok(raw.into())
        }
    }

    // ── Removal ─────────────────────────────────────────────────────

    /// Delete a file, or a folder with everything in it. Missing paths
    /// are a `NotFound` error.
    pub fn delete(&self, path: &str) -> RestResult<Metadata> {
        let target = path::resolve(&self.working_folder, path);
        let result: DeleteResult = self
            .rest
            .rpc("files/delete_v2", &args::build_delete(&target))?;
        result.metadata.into_metadata()
    }

    /// Delete every direct entry inside the working folder, leaving the
    /// folder itself in place. Returns the number of entries removed.
    pub fn clean_working_folder(&self) -> RestResult<usize> {
        let content = self.list_folder_path(&self.working_folder)?;
        let mut removed = 0;
        for entry in &content.entries {
            self.delete(entry.path_lower())?;
            removed += 1;
        }
        debug!("cleaned {removed} entries from {}", self.working_folder);
        Ok(removed)
    }

    /// Delete entries directly inside `folder_path` whose
    /// server-modified age is strictly greater than `days` days.
    ///
    /// `days <= 0` prunes nothing — a floor against wiping a folder
    /// through a bad default. Entries without a timestamp (folders) are
    /// always retained. Returns the number of entries removed.
    pub fn prune_folder(&self, folder_path: &str, days: i64) -> RestResult<usize> {
        if days <= 0 {
            debug!("prune of {folder_path} skipped: {days} days is not a valid age");
            return Ok(0);
        }
        let target = path::resolve(&self.working_folder, folder_path);
        let cutoff = Utc::now() - Duration::days(days);

        let content = self.list_folder_path(&target)?;
        let mut removed = 0;
        for file in content.files() {
            let Some(modified) = file.server_modified else {
                continue;
            };
            if modified < cutoff {
                debug!("pruning {} (modified {modified})", file.path_lower);
                self.delete(&file.path_lower)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    // ── Timestamps ──────────────────────────────────────────────────

    /// Parse the API's ISO-8601 UTC timestamp form
    /// (`2016-11-04T07:42:22Z`) into an instant.
    ///
    /// Malformed input is a local format error, deliberately distinct
    /// from [`RestError`](crate::error::RestError).
    pub fn parse_date(input: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%SZ").map(|naive| naive.and_utc())
    }
}
