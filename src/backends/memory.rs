use anyhow::{anyhow, Result};
use std::{cell::RefCell, rc::Rc};

use crate::{
    models::{Image, ImageId, PruneReport},
    services::ImageBackend,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    List(String),
    Remove(ImageId),
    Tag(ImageId, String),
    Prune,
}

#[derive(Debug, Default)]
struct State {
    images: Vec<Image>,
    calls: Vec<Call>,
    next_id: u64,
}

/// An image store kept in memory. Clones share the same store so a test can
/// keep a handle after giving the backend away.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    state: Rc<RefCell<State>>,
}

/// Mirrors the engine's `reference` filter: `name:tag` matches exactly,
/// a bare `name` matches any tag of that repository.
fn matches_reference(repo_tag: &str, reference: &str) -> bool {
    let has_tag = reference
        .rsplit('/')
        .next()
        .map(|last| last.contains(':'))
        .unwrap_or(false);

    if has_tag {
        repo_tag == reference
    } else {
        repo_tag
            .rsplitn(2, ':')
            .nth(1)
            .map(|repo| repo == reference)
            .unwrap_or(false)
    }
}

impl MemoryBackend {
    pub fn new() -> MemoryBackend {
        Default::default()
    }

    /// Registers an image the way a build does: each repo tag moves to the
    /// new image, leaving older holders dangling.
    pub fn add_image(&self, repo_tags: &[&str]) -> ImageId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = ImageId(format!("sha256:{:064x}", state.next_id));

        for image in state.images.iter_mut() {
            image.repo_tags.retain(|repo_tag| !repo_tags.contains(&repo_tag.as_str()));
        }

        state.images.push(Image {
            id: id.clone(),
            repo_tags: repo_tags.iter().map(|repo_tag| repo_tag.to_string()).collect(),
        });

        id
    }

    /// Adds a repo tag without taking it from other images, which a real
    /// engine never does. Used to provoke ambiguous lookups.
    pub fn attach_repo_tag(&self, id: &ImageId, repo_tag: &str) {
        let mut state = self.state.borrow_mut();
        if let Some(image) = state.images.iter_mut().find(|image| image.id == *id) {
            image.repo_tags.push(repo_tag.into());
        }
    }

    pub fn images(&self) -> Vec<Image> {
        self.state.borrow().images.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn resolve(&self, repo_tag: &str) -> Option<ImageId> {
        self.state
            .borrow()
            .images
            .iter()
            .find(|image| image.has_repo_tag(repo_tag))
            .map(|image| image.id.clone())
    }
}

impl ImageBackend for MemoryBackend {
    fn list_images(&mut self, reference: &str) -> Result<Vec<Image>> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::List(reference.into()));

        let images = state
            .images
            .iter()
            .filter(|image| {
                image
                    .repo_tags
                    .iter()
                    .any(|repo_tag| matches_reference(repo_tag, reference))
            })
            .cloned()
            .collect();

        Ok(images)
    }

    fn remove_image(&mut self, id: &ImageId, _force: bool, _noprune: bool) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Remove(id.clone()));

        let index = state
            .images
            .iter()
            .position(|image| image.id == *id)
            .ok_or_else(|| anyhow!("No such image: {}", id.0))?;
        state.images.remove(index);

        Ok(())
    }

    fn tag_image(&mut self, id: &ImageId, repo: &str, tag: &str) -> Result<()> {
        let repo_tag = format!("{}:{}", repo, tag);
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Tag(id.clone(), repo_tag.clone()));

        if !state.images.iter().any(|image| image.id == *id) {
            return Err(anyhow!("No such image: {}", id.0));
        }

        for image in state.images.iter_mut() {
            image.repo_tags.retain(|existing| *existing != repo_tag);
            if image.id == *id {
                image.repo_tags.push(repo_tag.clone());
            }
        }

        Ok(())
    }

    fn prune_images(&mut self) -> Result<PruneReport> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Prune);

        let before = state.images.len();
        state.images.retain(|image| !image.repo_tags.is_empty());

        Ok(PruneReport {
            images_deleted: before - state.images.len(),
            space_reclaimed: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_filter() {
        assert!(matches_reference("mandrel:21.3", "mandrel"));
        assert!(matches_reference("mandrel:21.3", "mandrel:21.3"));
        assert!(!matches_reference("mandrel:21.3", "mandrel:22.0"));
        assert!(!matches_reference("mandrel-jdk:21.3", "mandrel"));
        assert!(matches_reference("localhost:5000/mandrel:1", "localhost:5000/mandrel"));
    }

    #[test]
    fn rebuilding_leaves_old_image_dangling() {
        let mut backend = MemoryBackend::new();
        let old = backend.add_image(&["mandrel:21.3"]);
        let new = backend.add_image(&["mandrel:21.3"]);

        assert_eq!(backend.resolve("mandrel:21.3"), Some(new));
        assert_eq!(backend.prune_images().unwrap().images_deleted, 1);
        assert!(backend.images().iter().all(|image| image.id != old));
    }
}
