use anyhow::{bail, Context, Result};
use log::info;
use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::{services::BuildRunner, validation};

/// Runs `<script> <version>` with the script's output going straight to ours.
pub struct ScriptRunner {
    script: PathBuf,
}

impl ScriptRunner {
    /// The script is resolved against the working directory, the same way it
    /// was validated, so a bare `build.sh` is never looked up on `PATH`.
    pub fn new<P: AsRef<Path>>(script: P) -> ScriptRunner {
        ScriptRunner {
            script: validation::absolute(script.as_ref()),
        }
    }
}

impl BuildRunner for ScriptRunner {
    fn build(&mut self, version: &str) -> Result<()> {
        info!("running {:?} {}", self.script, version);

        let status = Command::new(&self.script)
            .arg(version)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("couldn't launch {:?}", self.script))?;

        match status.code() {
            Some(0) => Ok(()),
            Some(code) => bail!("Build Failed with status {}", code),
            None => bail!("Build Failed, the build script was terminated by a signal"),
        }
    }
}
