use crate::error::Result;
use crate::utils::fs;
use std::path::PathBuf;

pub fn show_status(name: &str, install_dir: PathBuf) -> Result<()> {
    let binary_path = install_dir.join(name);

    if !binary_path.exists() {
        println!("{name} is not installed");
        println!("   run `binshim install {name} <url>` to install it");
        return Ok(());
    }

    println!("{name} is installed at {}", binary_path.display());
    if fs::is_executable(&binary_path) {
        println!("binary is executable");
    } else {
        println!("warning: binary is not executable");
    }

    Ok(())
}
