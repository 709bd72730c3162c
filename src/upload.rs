//! Chunked upload — the multi-request upload-session protocol for
//! payloads larger than one request should carry.
//!
//! The protocol has three phases: **start** sends the first chunk and
//! receives the session id, **append** sends each further full chunk
//! against the session's acknowledged offset, **finish** commits the
//! remainder (possibly zero bytes) together with the destination path.
//! Each request depends on the offset the previous one established, so
//! the sequence must never be parallelized. A failure in any phase
//! aborts the whole upload; the caller retries from the beginning of
//! the stream if it retries at all.

use crate::args;
use crate::error::{RestError, RestResult};
use crate::request::RestClient;
use crate::types::{FileMetadata, RawFileEntry, UploadSessionStartResult};
use log::debug;
use std::io::Read;

/// Where an upload stands. Kept explicit so a failure can name the
/// phase and offset it happened at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPhase {
    NotStarted,
    InSession { session_id: String, offset: u64 },
    Committed,
}

/// Drives one upload session from start to commit. Single-use.
#[derive(Debug)]
pub struct ChunkedUploader<'a> {
    rest: &'a RestClient,
    chunk_size: u64,
    phase: UploadPhase,
}

/// Number of payload-carrying chunks for a given size.
pub fn chunk_count(total_size: u64, chunk_size: u64) -> u64 {
    total_size.div_ceil(chunk_size)
}

impl<'a> ChunkedUploader<'a> {
    pub fn new(rest: &'a RestClient, chunk_size: u64) -> Self {
        Self {
            rest,
            chunk_size,
            phase: UploadPhase::NotStarted,
        }
    }

    pub fn phase(&self) -> &UploadPhase {
        &self.phase
    }

    /// Upload exactly `total_size` bytes from `content` and commit them
    /// to `dest_path`.
    ///
    /// A `total_size` of zero still performs start and finish with
    /// empty payloads.
    pub fn upload<R: Read>(
        &mut self,
        content: &mut R,
        total_size: u64,
        dest_path: &str,
    ) -> RestResult<FileMetadata> {
        if self.phase != UploadPhase::NotStarted {
            return Err(RestError::protocol(
                "upload session already used; create a new uploader",
            ));
        }
        debug!(
            "chunked upload of {total_size} bytes to {dest_path}: {} chunks of {}",
            chunk_count(total_size, self.chunk_size),
            self.chunk_size
        );

        // Start: first chunk establishes the session.
        let first_len = total_size.min(self.chunk_size);
        let first = read_chunk(content, first_len)
            .map_err(|e| phase_context(e, "start", 0))?;
        let started: UploadSessionStartResult = self
            .rest
            .content_upload(
                "files/upload_session/start",
                &args::build_upload_session_start(),
                first,
            )
            .map_err(|e| phase_context(e, "start", 0))?;
        let session_id = started.session_id;
        let mut offset = first_len;
        self.phase = UploadPhase::InSession {
            session_id: session_id.clone(),
            offset,
        };

        // Append: every remaining full chunk.
        while total_size - offset >= self.chunk_size {
            let chunk = read_chunk(content, self.chunk_size)
                .map_err(|e| phase_context(e, "append", offset))?;
            self.rest
                .content_upload_discard(
                    "files/upload_session/append_v2",
                    &args::build_upload_session_append(&session_id, offset),
                    chunk,
                )
                .map_err(|e| phase_context(e, "append", offset))?;
            offset += self.chunk_size;
            self.phase = UploadPhase::InSession {
                session_id: session_id.clone(),
                offset,
            };
        }

        // Finish: the remainder (zero-length when the size divides
        // evenly) commits the session into a file.
        let tail = read_chunk(content, total_size - offset)
            .map_err(|e| phase_context(e, "finish", offset))?;
        let raw: RawFileEntry = self
            .rest
            .content_upload(
                "files/upload_session/finish",
                &args::build_upload_session_finish(&session_id, offset, dest_path),
                tail,
            )
            .map_err(|e| phase_context(e, "finish", offset))?;

        self.phase = UploadPhase::Committed;
        Ok(raw.into())
    }
}

/// Read exactly `len` bytes from the stream.
fn read_chunk<R: Read>(content: &mut R, len: u64) -> RestResult<Vec<u8>> {
    let mut buf = vec![0u8; len as usize];
    content.read_exact(&mut buf)?;
    Ok(buf)
}

fn phase_context(mut err: RestError, phase: &str, offset: u64) -> RestError {
    err.message = format!("upload {phase} failed at offset {offset}: {}", err.message);
    err
}
