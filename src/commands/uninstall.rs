use crate::error::{Result, ShimError};
use std::path::PathBuf;

pub fn uninstall_binary(name: &str, install_dir: PathBuf) -> Result<()> {
    let binary_path = install_dir.join(name);

    if !binary_path.exists() {
        return Err(ShimError::BinaryNotFound {
            name: name.to_string(),
        });
    }

    std::fs::remove_file(&binary_path)?;
    println!("{name} has been uninstalled");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uninstall_missing_binary_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = uninstall_binary("tool", tmp.path().to_path_buf()).unwrap_err();
        assert!(matches!(err, ShimError::BinaryNotFound { .. }));
    }

    #[test]
    fn uninstall_removes_only_the_binary() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("tool"), b"bytes").unwrap();
        std::fs::write(tmp.path().join("other"), b"keep").unwrap();

        uninstall_binary("tool", tmp.path().to_path_buf()).unwrap();

        assert!(!tmp.path().join("tool").exists());
        assert!(tmp.path().join("other").exists());
    }
}
