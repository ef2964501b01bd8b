use anyhow::{bail, Result};
use log::info;

use crate::{
    console::{self, Console},
    models::{self, Configuration, Image, PruneReport},
    services::ImageBackend,
};

/// Image lifecycle operations on top of an [`ImageBackend`]. Nothing is
/// cached: every decision is made on a fresh listing.
pub struct ImageStore {
    backend: Box<dyn ImageBackend>,
    console: Console,
}

impl ImageStore {
    pub fn new<B>(backend: B, console: Console) -> ImageStore
    where
        B: 'static + ImageBackend,
    {
        ImageStore {
            backend: Box::new(backend),
            console,
        }
    }

    /// Lists the images under `image_name` that carry `image_name:tag`.
    fn find(&mut self, image_name: &str, query: &str, tag: &str) -> Result<Vec<Image>> {
        let reference = models::reference(image_name, tag);
        let images = self
            .backend
            .list_images(query)?
            .into_iter()
            .filter(|image| image.has_repo_tag(&reference))
            .collect();

        Ok(images)
    }

    /// Force removes every image tagged `image_name:version`. Finding nothing
    /// is fine.
    pub fn delete_existing_image(&mut self, image_name: &str, version: &str) -> Result<usize> {
        let reference = models::reference(image_name, version);
        let images = self.find(image_name, image_name, version)?;

        for image in images.iter() {
            self.console
                .info(format!("Existing image found: {} : {}", reference, image.id.0))?;
            self.console.info("Deleting the existing image...")?;
            self.backend.remove_image(&image.id, true, false)?;
        }

        if images.is_empty() {
            info!("no existing image for {}", reference);
        }

        Ok(images.len())
    }

    /// Checks that every declared version has an image. All missing versions
    /// are reported before failing.
    pub fn validate_created_images(&mut self, configuration: &Configuration) -> Result<()> {
        let mut missing = Vec::new();

        for version in configuration.versions.iter() {
            let reference = models::reference(&configuration.image_name, version);
            let images = self.find(&configuration.image_name, &configuration.image_name, version)?;

            if images.is_empty() {
                self.console.error(format!(
                    "Expected {} to be created, but cannot find it",
                    reference
                ))?;
                missing.push(reference);
            } else {
                self.console.done(format!("Image {} created!", reference))?;
            }
        }

        if !missing.is_empty() {
            bail!(
                "{} of {} expected images are missing: {} - exiting",
                missing.len(),
                configuration.versions.len(),
                missing.join(", ")
            );
        }

        Ok(())
    }

    /// Points `image_name:id` at the single image behind `image_name:target`
    /// for each tag, in order. Tags applied before a failure stay in place.
    pub fn create_tags(&mut self, configuration: &Configuration) -> Result<()> {
        let image_name = &configuration.image_name;

        for tag in configuration.tags.iter() {
            let target = models::reference(image_name, &tag.target);
            let images = self.find(image_name, &target, &tag.target)?;

            let image = match images.as_slice() {
                [] => bail!(
                    "Unable to tag {} - target cannot be found {} - exiting",
                    tag.id,
                    target
                ),
                [image] => image,
                images => {
                    let ids = images
                        .iter()
                        .map(|image| image.id.0.as_str())
                        .collect::<Vec<_>>();
                    bail!(
                        "Unable to tag {} - multiple target matches for {} {:?} - exiting",
                        tag.id,
                        target,
                        ids
                    )
                }
            };

            self.backend.tag_image(&image.id, image_name, &tag.id)?;
            self.console
                .done(format!("Tag {} created, pointing to {}", tag.id, target))?;
        }

        Ok(())
    }

    pub fn prune(&mut self) -> Result<PruneReport> {
        let report = self.backend.prune_images()?;

        if report.images_deleted > 0 {
            self.console.info(format!(
                "Pruned {} image(s), reclaimed {}",
                report.images_deleted,
                console::format_size(report.space_reclaimed)
            ))?;
        } else {
            info!("prune found nothing to remove");
        }

        Ok(report)
    }
}
