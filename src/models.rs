use std::path::PathBuf;

#[derive(Clone, Debug, Hash, PartialOrd, Ord, PartialEq, Eq)]
pub struct ImageId(pub String);

/// An image as reported by the container runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub id: ImageId,
    pub repo_tags: Vec<String>,
}

impl Image {
    pub fn has_repo_tag(&self, reference: &str) -> bool {
        self.repo_tags.iter().any(|repo_tag| repo_tag == reference)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagSpec {
    pub id: String,
    pub target: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Configuration {
    pub image: PathBuf,
    pub image_name: String,
    pub build_script: PathBuf,
    pub versions: Vec<String>,
    pub tags: Vec<TagSpec>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub images_deleted: usize,
    pub space_reclaimed: u64,
}

/// Joins an image name and a tag into a `name:tag` repo tag.
pub fn reference(image_name: &str, tag: &str) -> String {
    format!("{}:{}", image_name, tag)
}
