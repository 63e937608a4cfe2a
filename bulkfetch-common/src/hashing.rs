//! Digest helpers. Only used to fingerprint downloaded files, MD5 is enough for that.
use std::path::Path;

use tokio::fs::read;

/// Supported digest algorithms.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HashAlgo {
    Md5,
}

/// Lowercase hex digest of `data`, optionally cut to `max_len` characters.
pub fn hash_hex(data: impl AsRef<[u8]>, algo: HashAlgo, max_len: Option<usize>) -> String {
    let mut digest = match algo {
        HashAlgo::Md5 => md5_hex(data),
    };

    if let Some(max) = max_len {
        digest.truncate(max);
    }
    digest
}

#[inline]
pub fn md5_hex(data: impl AsRef<[u8]>) -> String {
    format!("{:x}", md5::compute(data))
}

/// Reads the whole file and returns its MD5 digest.
pub async fn file_md5(path: &Path) -> Result<String, std::io::Error> {
    let file_content = read(path).await?;
    Ok(md5_hex(file_content))
}
