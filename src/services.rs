use anyhow::Result;
use std::path::Path;

use crate::models::{Configuration, Image, ImageId, PruneReport};

pub trait ConfigFrontend {
    fn configuration<P: AsRef<Path>>(&mut self, config_file_path: P) -> Result<Configuration>;
}

/// The subset of the container runtime's image API the controller relies on.
/// Implementations must always query the live store.
pub trait ImageBackend {
    /// Lists images matching a `name` or `name:tag` reference.
    fn list_images(&mut self, reference: &str) -> Result<Vec<Image>>;

    fn remove_image(&mut self, id: &ImageId, force: bool, noprune: bool) -> Result<()>;

    /// Adds the repo tag `repo:tag` to the image `id`.
    fn tag_image(&mut self, id: &ImageId, repo: &str, tag: &str) -> Result<()>;

    /// Removes dangling images.
    fn prune_images(&mut self) -> Result<PruneReport>;
}

pub trait BuildRunner {
    fn build(&mut self, version: &str) -> Result<()>;
}
