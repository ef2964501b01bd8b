use anyhow::{Context, Result};
use bollard::{
    image::{ListImagesOptions, PruneImagesOptions, RemoveImageOptions, TagImageOptions},
    Docker,
};
use log::{debug, info};
use std::collections::HashMap;
use tokio::runtime::{self, Runtime};

use crate::{
    models::{Image, ImageId, PruneReport},
    services::ImageBackend,
};

/// Talks to the Docker engine API. One client is kept for the whole run and
/// every call blocks on a single threaded runtime.
pub struct DockerBackend {
    runtime: Runtime,
    client: Docker,
}

impl DockerBackend {
    pub fn connect() -> Result<DockerBackend> {
        let runtime = runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let client = {
            let _guard = runtime.enter();
            Docker::connect_with_local_defaults()
                .context("couldn't connect to the container runtime")?
        };

        let reply = runtime
            .block_on(client.ping())
            .context("couldn't reach the container runtime")?;
        info!("container runtime answered ping with {:?}", reply);

        Ok(DockerBackend { runtime, client })
    }
}

impl ImageBackend for DockerBackend {
    fn list_images(&mut self, reference: &str) -> Result<Vec<Image>> {
        let mut filters = HashMap::new();
        filters.insert("reference", vec![reference]);

        let options = ListImagesOptions {
            filters,
            ..Default::default()
        };

        let summaries = self
            .runtime
            .block_on(self.client.list_images(Some(options)))
            .with_context(|| format!("couldn't list images matching {}", reference))?;
        debug!("{} image(s) match {}", summaries.len(), reference);

        let images = summaries
            .into_iter()
            .map(|summary| Image {
                id: ImageId(summary.id),
                repo_tags: summary.repo_tags,
            })
            .collect();

        Ok(images)
    }

    fn remove_image(&mut self, id: &ImageId, force: bool, noprune: bool) -> Result<()> {
        let options = RemoveImageOptions { force, noprune };

        let deleted = self
            .runtime
            .block_on(self.client.remove_image(&id.0, Some(options), None))
            .with_context(|| format!("couldn't remove image {}", id.0))?;
        debug!("removing {} touched {} layer(s)", id.0, deleted.len());

        Ok(())
    }

    fn tag_image(&mut self, id: &ImageId, repo: &str, tag: &str) -> Result<()> {
        let options = TagImageOptions { repo, tag };

        self.runtime
            .block_on(self.client.tag_image(&id.0, Some(options)))
            .with_context(|| format!("couldn't tag image {} as {}:{}", id.0, repo, tag))?;

        Ok(())
    }

    fn prune_images(&mut self) -> Result<PruneReport> {
        let reply = self
            .runtime
            .block_on(self.client.prune_images(None::<PruneImagesOptions<String>>))
            .context("couldn't prune images")?;

        Ok(PruneReport {
            images_deleted: reply.images_deleted.map(|images| images.len()).unwrap_or(0),
            space_reclaimed: reply.space_reclaimed.unwrap_or(0).max(0) as u64,
        })
    }
}
