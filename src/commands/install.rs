use crate::core::installer::Installer;
use crate::core::target::InstallTarget;
use crate::core::transport::{HttpTransport, TransportOptions};
use crate::error::Result;
use std::path::PathBuf;

pub fn install_binary(
    name: &str,
    url: &str,
    install_dir: PathBuf,
    options: &TransportOptions,
    quiet: bool,
    force: bool,
) -> Result<()> {
    let target = InstallTarget::new(name, url, install_dir)?;
    let transport = HttpTransport::new();
    let installer = Installer::new(&target, &transport);

    if force && installer.exists() {
        installer.uninstall()?;
    }

    installer.install(options, quiet)
}
