use crate::core::extract::{self, ExtractStrategy};
use crate::core::target::InstallTarget;
use crate::core::transport::{Transport, TransportOptions};
use crate::error::{Result, ShimError};
use crate::utils::fs;

/// Fetches, extracts and persists the binary described by an
/// [`InstallTarget`].
///
/// An install either fully succeeds or leaves nothing at the binary path:
/// extraction streams into a staging file which is renamed into place only
/// after the write and permission bits are in order.
pub struct Installer<'a> {
    target: &'a InstallTarget,
    transport: &'a dyn Transport,
    extractor: Box<dyn ExtractStrategy>,
}

impl<'a> Installer<'a> {
    pub fn new(target: &'a InstallTarget, transport: &'a dyn Transport) -> Self {
        Self {
            target,
            transport,
            extractor: extract::select(),
        }
    }

    pub fn with_extractor(
        target: &'a InstallTarget,
        transport: &'a dyn Transport,
        extractor: Box<dyn ExtractStrategy>,
    ) -> Self {
        Self {
            target,
            transport,
            extractor,
        }
    }

    /// Whether a filesystem entry exists at the binary path. Pure query.
    pub fn exists(&self) -> bool {
        self.target.binary_path().exists()
    }

    /// Download and persist the binary. A no-op when it is already installed.
    pub fn install(&self, options: &TransportOptions, quiet: bool) -> Result<()> {
        let name = self.target.name();

        if self.exists() {
            if !quiet {
                eprintln!("{name} is already installed, skipping installation.");
            }
            return Ok(());
        }

        // Destructive reset: whatever a prior partial attempt left behind in
        // the install directory is discarded wholesale.
        fs::remove_dir_recursive(self.target.install_dir())?;
        fs::ensure_dir_exists(self.target.install_dir())?;

        if !quiet {
            eprintln!("Downloading release from {}", self.target.url());
        }

        let mut body = self.transport.fetch(self.target.url(), options)?;

        let staging = self.target.install_dir().join(format!(".{name}.partial"));
        let extracted = self.extractor.extract(body.as_mut(), &staging);
        let files = match extracted {
            Ok(files) => files,
            Err(e) => {
                let _ = std::fs::remove_file(&staging);
                return Err(e);
            }
        };

        if files == 0 {
            let _ = std::fs::remove_file(&staging);
            return Err(ShimError::extraction(
                "archive contained no file entries",
            ));
        }

        // Publish atomically; exists() never observes a torn write.
        std::fs::rename(&staging, self.target.binary_path())?;

        if !quiet {
            eprintln!("{name} has been installed!");
        }
        Ok(())
    }

    /// Remove the installed binary.
    pub fn uninstall(&self) -> Result<()> {
        if !self.exists() {
            return Err(ShimError::BinaryNotFound {
                name: self.target.name().to_string(),
            });
        }
        std::fs::remove_file(self.target.binary_path())?;
        Ok(())
    }
}
