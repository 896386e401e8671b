use crate::core::launcher::Launcher;
use crate::core::target::InstallTarget;
use crate::core::transport::{HttpTransport, TransportOptions};
use crate::error::Result;
use std::ffi::OsString;
use std::path::PathBuf;

/// Lazy-install then exec-forward. Returns the child's exit code, which the
/// CLI layer propagates as its own.
pub fn run_binary(
    name: &str,
    url: &str,
    install_dir: PathBuf,
    options: &TransportOptions,
    args: Vec<OsString>,
) -> Result<i32> {
    let target = InstallTarget::new(name, url, install_dir)?;
    let transport = HttpTransport::new();
    Launcher::new(&target, &transport).launch(&args, options)
}
