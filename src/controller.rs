use anyhow::{anyhow, Result};
use log::{info, warn};

use crate::{
    console::Console,
    models::{self, Configuration},
    services::BuildRunner,
    store::ImageStore,
};

/// Validation happens before a controller exists, so a new controller
/// starts out `Ready`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Ready,
    Building(String),
    PostValidating,
    Tagging,
    Pruning,
    Done,
    Failed,
}

/// Drives one run over a validated configuration: rebuild every version in
/// order, check the results, tag, then prune.
pub struct Controller {
    configuration: Configuration,
    store: ImageStore,
    runner: Box<dyn BuildRunner>,
    console: Console,
    phase: Phase,
}

impl Controller {
    pub fn init<R>(
        configuration: Configuration,
        store: ImageStore,
        runner: R,
        console: Console,
    ) -> Controller
    where
        R: 'static + BuildRunner,
    {
        Controller {
            configuration,
            store,
            runner: Box::new(runner),
            console,
            phase: Phase::Ready,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Runs every phase, stopping at the first failure. Once failed the
    /// controller stays failed.
    pub fn run(&mut self) -> Result<()> {
        if self.phase == Phase::Failed {
            return Err(anyhow!("a previous run has failed"));
        }

        let result = self.run_phases();
        if result.is_err() {
            warn!("run failed in phase {:?}", self.phase);
            self.phase = Phase::Failed;
        }

        result
    }

    fn run_phases(&mut self) -> Result<()> {
        self.build_images()?;
        self.validate_images()?;
        self.create_tags()?;
        self.prune();

        self.phase = Phase::Done;
        self.console.done("all images built")?;

        Ok(())
    }

    /// A stale image is deleted before each build so it can't be taken for
    /// the output of a build that did nothing.
    pub fn build_images(&mut self) -> Result<()> {
        let image_name = self.configuration.image_name.clone();

        for version in self.configuration.versions.clone() {
            self.phase = Phase::Building(version.clone());
            let reference = models::reference(&image_name, &version);

            self.store.delete_existing_image(&image_name, &version)?;

            self.console.info(format!("Building {}", reference))?;
            self.runner.build(&version).map_err(|err| {
                anyhow!(
                    "Build of image {} has failed: {:#} - exiting",
                    reference,
                    err
                )
            })?;
            info!("built {}", reference);
        }

        Ok(())
    }

    pub fn validate_images(&mut self) -> Result<()> {
        self.phase = Phase::PostValidating;
        self.store.validate_created_images(&self.configuration)
    }

    pub fn create_tags(&mut self) -> Result<()> {
        self.phase = Phase::Tagging;
        self.store.create_tags(&self.configuration)
    }

    pub fn prune(&mut self) {
        self.phase = Phase::Pruning;

        if let Err(err) = self.store.prune() {
            warn!("pruning images failed: {:#}", err);
        }
    }
}
