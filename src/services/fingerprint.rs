// src/services/fingerprint.rs

//! Attachment fingerprinting.
//!
//! Digests a byte stream chunk by chunk so memory use stays bounded by the
//! chunk size, whatever the attachment length.

use futures::io::{AsyncRead, AsyncReadExt};
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Bytes read from the stream per digest update.
pub const CHUNK_SIZE: usize = 4096;

/// Hex-encoded SHA-256 of everything `reader` yields.
pub async fn fingerprint<R>(reader: R) -> Result<String>
where
    R: AsyncRead + Unpin,
{
    fingerprint_with_chunk_size(reader, CHUNK_SIZE).await
}

/// Same as [`fingerprint`], reading at most `chunk_size` bytes at a time.
pub async fn fingerprint_with_chunk_size<R>(mut reader: R, chunk_size: usize) -> Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total = 0usize;

    loop {
        let read = reader.read(&mut buf).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
        total += read;
    }

    log::trace!("Fingerprinted {} bytes", total);
    Ok(hex::encode(hasher.finalize()))
}
