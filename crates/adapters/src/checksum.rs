// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File checksums for patch verification

use md5::{Digest, Md5};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Lowercase hex MD5 of a file's contents
pub async fn md5_file(path: &Path) -> std::io::Result<String> {
    let path: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || md5_file_blocking(&path))
        .await
        .map_err(std::io::Error::other)?
}

fn md5_file_blocking(path: &Path) -> std::io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Md5::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
#[path = "checksum_tests.rs"]
mod tests;
