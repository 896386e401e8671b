use crate::error::{Result, ShimError};
use crate::utils::fs;
use flate2::read::GzDecoder;
use std::io::Read;
use std::path::{Path, PathBuf};
use tar::Archive;

/// One way of turning a gzip-compressed tar stream into a binary on disk.
///
/// Implementations consume the stream, persist every regular-file entry to
/// `dest` (later entries overwrite earlier ones) and return how many file
/// entries were written. `dest` ends up executable; non-file entries are
/// skipped.
pub trait ExtractStrategy {
    fn extract(&self, archive: &mut dyn Read, dest: &Path) -> Result<u64>;
}

/// Pick the extraction strategy once at startup.
///
/// The in-process streaming decoder is always available and preferred; the
/// external `tar(1)` strategy can be forced with `BINSHIM_EXTRACTOR=system`
/// when the command is on PATH.
pub fn select() -> Box<dyn ExtractStrategy> {
    if std::env::var("BINSHIM_EXTRACTOR").as_deref() == Ok("system") {
        if let Some(system) = SystemTarExtractor::locate() {
            return Box::new(system);
        }
    }
    Box::new(StreamingExtractor)
}

/// Streaming decoder: gunzip and untar as the bytes arrive, so memory use
/// stays bounded regardless of archive size.
#[derive(Debug, Default)]
pub struct StreamingExtractor;

impl ExtractStrategy for StreamingExtractor {
    fn extract(&self, archive: &mut dyn Read, dest: &Path) -> Result<u64> {
        let decoder = GzDecoder::new(archive);
        let mut tarball = Archive::new(decoder);

        let mut files = 0u64;
        let entries = tarball
            .entries()
            .map_err(|e| ShimError::extraction(e.to_string()))?;
        for entry in entries {
            let mut entry = entry.map_err(|e| ShimError::extraction(e.to_string()))?;

            if entry.header().entry_type().is_file() {
                let mut out = std::fs::File::create(dest)?;
                std::io::copy(&mut entry, &mut out)
                    .map_err(|e| ShimError::extraction(e.to_string()))?;
                apply_mode(dest, entry.header().mode().ok());
                files += 1;
            } else {
                // Drain skipped entries so the stream keeps moving.
                std::io::copy(&mut entry, &mut std::io::sink())
                    .map_err(|e| ShimError::extraction(e.to_string()))?;
            }
        }

        Ok(files)
    }
}

/// Fallback strategy: gunzip to a temporary `.tar` file and unpack it with
/// the system `tar(1)` command.
#[derive(Debug)]
pub struct SystemTarExtractor {
    tar_bin: PathBuf,
}

impl SystemTarExtractor {
    /// Locate `tar(1)` on PATH; `None` when the command is unavailable.
    pub fn locate() -> Option<Self> {
        which::which("tar").ok().map(|tar_bin| Self { tar_bin })
    }
}

impl ExtractStrategy for SystemTarExtractor {
    fn extract(&self, archive: &mut dyn Read, dest: &Path) -> Result<u64> {
        let dir = dest
            .parent()
            .ok_or_else(|| ShimError::extraction("destination has no parent directory"))?;

        let mut tar_file = tempfile::Builder::new().suffix(".tar").tempfile_in(dir)?;
        let mut decoder = GzDecoder::new(archive);
        std::io::copy(&mut decoder, tar_file.as_file_mut())
            .map_err(|e| ShimError::extraction(e.to_string()))?;

        // Listing preserves archive order, which the extracted directory
        // tree does not; later the rename loop walks this order so multi-file
        // archives resolve exactly like the streaming strategy.
        let listing = std::process::Command::new(&self.tar_bin)
            .arg("-tf")
            .arg(tar_file.path())
            .output()?;
        if !listing.status.success() {
            return Err(ShimError::extraction(format!(
                "tar exited with status {:?}: {}",
                listing.status.code(),
                String::from_utf8_lossy(&listing.stderr).trim()
            )));
        }

        let scratch = tempfile::tempdir_in(dir)?;
        let output = std::process::Command::new(&self.tar_bin)
            .arg("-xf")
            .arg(tar_file.path())
            .arg("-C")
            .arg(scratch.path())
            .output()?;
        if !output.status.success() {
            return Err(ShimError::extraction(format!(
                "tar exited with status {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        // Flatten whatever directory layout the archive used: every regular
        // file is moved onto the destination in archive order, so the end
        // state matches the streaming strategy (last file entry wins).
        let mut files = 0u64;
        for entry in String::from_utf8_lossy(&listing.stdout).lines() {
            let path = scratch.path().join(entry.trim_start_matches("./"));
            if path.is_file() {
                std::fs::rename(&path, dest)?;
                files += 1;
            }
        }

        if files > 0 && !fs::is_executable(dest) {
            if let Err(e) = fs::make_executable(dest) {
                eprintln!(
                    "warning: could not set executable permissions on {}: {e}",
                    dest.display()
                );
            }
        }

        Ok(files)
    }
}

/// Carry the archive entry's permission bits over to the written file. When
/// the mode is unavailable or lacks execute bits, fall back to 0755. A
/// failure here is logged and non-fatal; a truly unusable binary fails
/// clearly at exec time instead.
fn apply_mode(path: &Path, mode: Option<u32>) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = match mode {
            Some(mode) if mode & 0o111 != 0 => mode,
            _ => 0o755,
        };
        if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)) {
            eprintln!(
                "warning: could not set permissions on {}: {e}",
                path.display()
            );
        }
    }

    #[cfg(not(unix))]
    {
        let _ = (path, mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testutil::{gzipped_tarball, Entry};
    use pretty_assertions::assert_eq;

    #[test]
    fn streaming_extracts_a_single_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("tool");
        let archive = gzipped_tarball(&[Entry::File {
            name: "tool",
            data: b"#!/bin/sh\nexit 0\n",
            mode: 0o755,
        }]);

        let files = StreamingExtractor
            .extract(&mut archive.as_slice(), &dest)
            .unwrap();

        assert_eq!(files, 1);
        assert_eq!(std::fs::read(&dest).unwrap(), b"#!/bin/sh\nexit 0\n");
        #[cfg(unix)]
        assert!(fs::is_executable(&dest));
    }

    #[test]
    fn streaming_reports_zero_file_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("tool");
        let archive = gzipped_tarball(&[Entry::Dir { name: "empty/" }]);

        let files = StreamingExtractor
            .extract(&mut archive.as_slice(), &dest)
            .unwrap();

        assert_eq!(files, 0);
        assert!(!dest.exists());
    }

    #[test]
    fn streaming_last_file_entry_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("tool");
        let archive = gzipped_tarball(&[
            Entry::Dir { name: "pkg/" },
            Entry::File {
                name: "pkg/first",
                data: b"first",
                mode: 0o644,
            },
            Entry::File {
                name: "pkg/second",
                data: b"second",
                mode: 0o755,
            },
        ]);

        let files = StreamingExtractor
            .extract(&mut archive.as_slice(), &dest)
            .unwrap();

        assert_eq!(files, 2);
        assert_eq!(std::fs::read(&dest).unwrap(), b"second");
    }

    #[test]
    fn streaming_rejects_garbage() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("tool");

        let err = StreamingExtractor
            .extract(&mut &b"not a gzip stream"[..], &dest)
            .unwrap_err();
        assert!(matches!(err, ShimError::Extraction { .. }));
        assert!(!dest.exists());
    }

    #[cfg(unix)]
    #[test]
    fn system_tar_matches_streaming_end_state() {
        let Some(extractor) = SystemTarExtractor::locate() else {
            return;
        };

        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("tool");
        let archive = gzipped_tarball(&[
            Entry::Dir { name: "pkg/" },
            Entry::File {
                name: "pkg/tool",
                data: b"payload",
                mode: 0o755,
            },
        ]);

        let files = extractor.extract(&mut archive.as_slice(), &dest).unwrap();

        assert_eq!(files, 1);
        assert_eq!(std::fs::read(&dest).unwrap(), b"payload");
        assert!(fs::is_executable(&dest));
    }

    #[cfg(unix)]
    #[test]
    fn system_tar_multi_file_resolution_follows_archive_order() {
        let Some(extractor) = SystemTarExtractor::locate() else {
            return;
        };

        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("tool");
        // Archive order and lexicographic order disagree here: the last
        // entry in the archive sorts first by name.
        let archive = gzipped_tarball(&[
            Entry::File {
                name: "z-first",
                data: b"first",
                mode: 0o755,
            },
            Entry::File {
                name: "a-second",
                data: b"second",
                mode: 0o755,
            },
        ]);

        let files = extractor.extract(&mut archive.as_slice(), &dest).unwrap();

        assert_eq!(files, 2);
        assert_eq!(std::fs::read(&dest).unwrap(), b"second");
    }

    #[test]
    fn select_prefers_streaming() {
        // No env override in the test environment; just make sure selection
        // yields a usable strategy.
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("tool");
        let archive = gzipped_tarball(&[Entry::File {
            name: "tool",
            data: b"bytes",
            mode: 0o755,
        }]);

        let files = select().extract(&mut archive.as_slice(), &dest).unwrap();
        assert_eq!(files, 1);
    }
}
