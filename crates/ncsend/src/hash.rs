//! SHA-256 digests in the same form `sha256sum` prints them.

use std::path::Path;

use ncsend_core::{NcsendError, Result};
use ring::digest::{Context, SHA256};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Read-ahead used while hashing (64 KiB).
const CHUNK: usize = 64 * 1024;

/// Length of a hex-encoded SHA-256 digest.
pub const SHA256_HEX_LEN: usize = 64;

/// Digest of the file at `path`, streamed in chunks.
pub async fn sha256_file(path: &Path) -> Result<String> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| NcsendError::io(format!("cannot open {} for checksum", path.display()), e))?;
    sha256_reader(file)
        .await
        .map_err(|e| NcsendError::io(format!("checksum read failed on {}", path.display()), e))
}

/// Lowercase hex digest of everything `reader` yields.
pub async fn sha256_reader<R: AsyncRead + Unpin>(reader: R) -> std::io::Result<String> {
    let mut reader = BufReader::with_capacity(CHUNK, reader);
    let mut digest = Context::new(&SHA256);
    loop {
        let chunk = reader.fill_buf().await?;
        if chunk.is_empty() {
            break;
        }
        let n = chunk.len();
        digest.update(chunk);
        reader.consume(n);
    }
    Ok(hex::encode(digest.finish()))
}

/// Extract the digest from one line of `sha256sum` output.
///
/// The first whitespace-delimited token is the digest; it is lowercased and
/// must be 64 hex characters.
pub fn parse_sha256sum(output: &str) -> Option<String> {
    let token = output.split_whitespace().next()?;
    // Files with backslashes in their name get a leading `\`
    let token = token.strip_prefix('\\').unwrap_or(token).to_ascii_lowercase();
    (token.len() == SHA256_HEX_LEN && token.bytes().all(|b| b.is_ascii_hexdigit())).then_some(token)
}
