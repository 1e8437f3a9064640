//! BLAKE3 integrity checks for release artifacts

use blake3::Hasher;
use downlink_errors::Error;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Size of chunks for streaming hash computation
const CHUNK_SIZE: usize = 64 * 1024; // 64KB

/// Compute the blake3 hash of a file as lowercase hex.
///
/// # Errors
/// Returns an error if the file cannot be opened or read.
pub async fn hash_file(path: &Path) -> Result<String, Error> {
    let mut file = File::open(path)
        .await
        .map_err(|e| Error::io_with_path(&e, path))?;

    let mut hasher = Hasher::new();
    let mut buffer = vec![0; CHUNK_SIZE];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .map_err(|e| Error::io_with_path(&e, path))?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize().as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn hashes_match_blake3_of_content() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"release bytes").unwrap();

        let computed = hash_file(temp.path()).await.unwrap();
        let expected = hex::encode(blake3::hash(b"release bytes").as_bytes());
        assert_eq!(computed, expected);
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        assert!(hash_file(Path::new("/nonexistent/artifact")).await.is_err());
    }
}
