//! Installer: unpack the verified bundle, archive it, drop the manifest.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::process::{CommandRunner, ToolCommand};

/// `tar -xf <bundle> -C <compat_dir>`.
pub fn extract(runner: &dyn CommandRunner, bundle: &Path, compat_dir: &Path) -> Result<()> {
    let cmd = ToolCommand::new("tar")
        .arg("-xf")
        .path_arg(bundle)
        .arg("-C")
        .path_arg(compat_dir);
    runner.run(&cmd).context("decompress bundle")?;
    Ok(())
}

/// `mv <bundle> <archive_dir>/` so later runs see the bundle as installed.
pub fn archive(runner: &dyn CommandRunner, bundle: &Path, archive_dir: &Path) -> Result<()> {
    let target = format!("{}/", archive_dir.display());
    let cmd = ToolCommand::new("mv").path_arg(bundle).arg(target.as_str());
    runner.run(&cmd).context("move file")?;
    if let Some(name) = bundle.file_name() {
        tracing::debug!(path = %archive_dir.join(name).display(), "moved file");
    }
    Ok(())
}

/// Remove the checksum manifest so it never shows up as an installed entry.
pub fn remove_manifest(manifest: &Path) -> Result<()> {
    fs::remove_file(manifest).with_context(|| format!("remove {}", manifest.display()))
}

/// Run the three install steps; the first failure aborts the rest.
pub fn install(
    runner: &dyn CommandRunner,
    config: &Config,
    bundle: &str,
    manifest: &str,
) -> Result<()> {
    let bundle_path = config.work_dir().join(bundle);
    extract(runner, &bundle_path, config.compatibility_tools_dir())?;
    archive(runner, &bundle_path, config.archive_dir())?;
    remove_manifest(&config.work_dir().join(manifest))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::process::ToolError;
    use std::cell::RefCell;
    use std::path::PathBuf;

    struct Recording {
        fail_program: Option<&'static str>,
        seen: RefCell<Vec<String>>,
    }

    impl CommandRunner for Recording {
        fn run(&self, cmd: &ToolCommand) -> Result<String> {
            self.seen.borrow_mut().push(cmd.to_string());
            if self.fail_program == Some(cmd.program.as_str()) {
                return Err(ToolError {
                    command: cmd.to_string(),
                    status: "exit status: 2".to_string(),
                    output: "boom".to_string(),
                }
                .into());
            }
            Ok(String::new())
        }
    }

    fn config(root: &Path) -> Config {
        let home = root.to_string_lossy().into_owned();
        Config::from_lookup(
            move |key| (key == "HOME").then(|| home.clone()),
            &Settings::default(),
            root.join("work"),
        )
        .unwrap()
    }

    #[test]
    fn runs_tar_then_mv_then_removes_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        fs::create_dir_all(cfg.work_dir()).unwrap();
        let manifest: PathBuf = cfg.work_dir().join("foo.sha512sum");
        fs::write(&manifest, b"sums").unwrap();

        let runner = Recording {
            fail_program: None,
            seen: RefCell::new(Vec::new()),
        };
        install(&runner, &cfg, "foo.tar.gz", "foo.sha512sum").unwrap();

        let bundle = cfg.work_dir().join("foo.tar.gz");
        assert_eq!(
            *runner.seen.borrow(),
            vec![
                format!(
                    "tar -xf {} -C {}",
                    bundle.display(),
                    cfg.compatibility_tools_dir().display()
                ),
                format!("mv {} {}/", bundle.display(), cfg.archive_dir().display()),
            ]
        );
        assert!(!manifest.exists());
    }

    #[test]
    fn extract_failure_skips_archive_and_keeps_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        fs::create_dir_all(cfg.work_dir()).unwrap();
        let manifest = cfg.work_dir().join("foo.sha512sum");
        fs::write(&manifest, b"sums").unwrap();

        let runner = Recording {
            fail_program: Some("tar"),
            seen: RefCell::new(Vec::new()),
        };
        let err = install(&runner, &cfg, "foo.tar.gz", "foo.sha512sum").unwrap_err();
        assert!(format!("{:#}", err).contains("decompress bundle"));
        assert_eq!(runner.seen.borrow().len(), 1);
        assert!(manifest.exists());
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = remove_manifest(&dir.path().join("gone.sha512sum")).unwrap_err();
        assert!(err.to_string().contains("gone.sha512sum"));
    }
}
