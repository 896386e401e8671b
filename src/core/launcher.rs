use crate::core::installer::Installer;
use crate::core::target::InstallTarget;
use crate::core::transport::{Transport, TransportOptions};
use crate::error::{Result, ShimError};
use std::ffi::OsString;
use std::process::{Command, ExitStatus};

/// Runs the binary described by an [`InstallTarget`], installing it first
/// when absent.
///
/// The spawned child inherits the caller's working directory and standard
/// streams, so the shim is invisible: all output is the child's, and the
/// returned code is the child's exit status.
pub struct Launcher<'a> {
    target: &'a InstallTarget,
    transport: &'a dyn Transport,
}

impl<'a> Launcher<'a> {
    pub fn new(target: &'a InstallTarget, transport: &'a dyn Transport) -> Self {
        Self { target, transport }
    }

    /// Ensure the binary is installed, spawn it with `args` forwarded
    /// verbatim, and wait for it. Returns the child's exit code.
    ///
    /// A spawn failure is an error; a clean non-zero child exit is not.
    pub fn launch(&self, args: &[OsString], options: &TransportOptions) -> Result<i32> {
        let installer = Installer::new(self.target, self.transport);
        if !installer.exists() {
            // Lazy install: routine logs are suppressed so the pass-through
            // invocation looks uninterrupted.
            installer.install(options, true)?;
        }

        let status = Command::new(self.target.binary_path())
            .args(args)
            .status()
            .map_err(|source| ShimError::Spawn {
                path: self.target.binary_path().to_path_buf(),
                source,
            })?;

        Ok(exit_code(status))
    }
}

/// Map an exit status to a concrete process exit code. A signal-terminated
/// child maps to the shell convention `128 + signal` on Unix.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
