use anyhow::{ensure, Result};
use std::{
    collections::BTreeSet as Set,
    env,
    path::{Path, PathBuf},
};

use crate::models::Configuration;

/// Resolves `path` against the working directory for diagnostics.
pub fn absolute(path: &Path) -> PathBuf {
    env::current_dir()
        .map(|dir| dir.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Checks the configuration against the file system before anything touches
/// the container runtime. Tags are checked before versions, and the first
/// violation is returned.
pub fn validate(configuration: &Configuration, modules_dir: &Path) -> Result<()> {
    ensure!(
        configuration.image.is_file(),
        "The image descriptor {} does not exist - exiting",
        absolute(&configuration.image).display()
    );
    ensure!(
        configuration.build_script.is_file(),
        "The build script {} does not exist - exiting",
        absolute(&configuration.build_script).display()
    );

    for tag in configuration.tags.iter() {
        ensure!(
            configuration.versions.contains(&tag.target),
            "A tag target on unknown version: {} - exiting",
            tag.target
        );
        ensure!(
            tag.id.to_lowercase() != tag.target.to_lowercase(),
            "A tag name is the same as the target: {} - exiting",
            tag.id
        );
    }

    let mut seen = Set::new();
    for version in configuration.versions.iter() {
        ensure!(
            seen.insert(version),
            "The version {} is declared more than once - exiting",
            version
        );

        let module = modules_dir.join(version);
        ensure!(
            module.is_dir(),
            "The module {} for version {} does not exist - exiting",
            absolute(&module).display(),
            version
        );
    }

    Ok(())
}
