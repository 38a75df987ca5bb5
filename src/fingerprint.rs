use crate::snapshot::EntryKind;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum FingerprintError {
    #[error("IO error: {0}")]
    Io(std::io::Error),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
}

/// Classifies a filesystem entry and computes its identity.
///
/// Classification is based on `symlink_metadata`, so symlinks are never
/// followed: a symlink is identified by its raw target string even when the
/// target does not exist. Regular files are identified by their content
/// digest. Everything else (devices, sockets, fifos, ...) is recorded as
/// `Other` with no identity and no error, even when unreadable.
///
/// # Errors
/// A regular file that cannot be read (permissions, vanished mid-scan) is an
/// error; the caller treats it as fatal for the whole scan.
pub fn fingerprint_entry(path: &Path) -> Result<EntryKind, FingerprintError> {
    let metadata = std::fs::symlink_metadata(path).map_err(|e| io_error(e, path))?;
    let file_type = metadata.file_type();

    if file_type.is_symlink() {
        let target = std::fs::read_link(path).map_err(|e| io_error(e, path))?;
        Ok(EntryKind::Symlink {
            target: target.to_string_lossy().into_owned(),
        })
    } else if file_type.is_file() {
        Ok(EntryKind::File {
            digest: digest_file(path)?,
        })
    } else {
        Ok(EntryKind::Other)
    }
}

/// Computes the hex SHA-256 of a file by streaming it in fixed-size chunks.
///
/// The chunk size is an implementation detail: identical content produces an
/// identical digest regardless of how the reads are split.
pub fn digest_file(path: &Path) -> Result<String, FingerprintError> {
    let mut file = File::open(path).map_err(|e| io_error(e, path))?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 65536];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(FingerprintError::Io)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let digest = format!("{:x}", hasher.finalize());

    debug!("digest of {} is {}", path.display(), digest);

    Ok(digest)
}

fn io_error(e: std::io::Error, path: &Path) -> FingerprintError {
    if e.kind() == std::io::ErrorKind::PermissionDenied {
        FingerprintError::PermissionDenied(path.to_path_buf())
    } else {
        FingerprintError::Io(e)
    }
}
