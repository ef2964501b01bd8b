use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use crate::{
    models::{Configuration, TagSpec},
    services::ConfigFrontend,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct BuildFile {
    pub image: String,

    pub image_name: String,

    pub build_script: String,

    pub versions: Vec<String>,

    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Tag {
    pub id: String,
    pub target: String,
}

impl From<BuildFile> for Configuration {
    fn from(file: BuildFile) -> Configuration {
        Configuration {
            image: PathBuf::from(file.image),
            image_name: file.image_name,
            build_script: PathBuf::from(file.build_script),
            versions: file.versions,
            tags: file
                .tags
                .into_iter()
                .map(|tag| TagSpec {
                    id: tag.id,
                    target: tag.target,
                })
                .collect(),
        }
    }
}

pub struct BuildFileFrontend;

impl BuildFileFrontend {
    pub fn new() -> BuildFileFrontend {
        BuildFileFrontend
    }

    fn parse<R: Read>(reader: R) -> Result<Configuration> {
        let file: BuildFile = serde_yaml::from_reader(reader)?;
        Ok(file.into())
    }
}

impl ConfigFrontend for BuildFileFrontend {
    fn configuration<P: AsRef<Path>>(&mut self, config_file_path: P) -> Result<Configuration> {
        let config_file_path = config_file_path.as_ref();
        let config_file = File::open(config_file_path)
            .with_context(|| format!("couldn't open configuration {:?}", config_file_path))?;

        BuildFileFrontend::parse(config_file)
            .with_context(|| format!("couldn't parse configuration {:?}", config_file_path))
    }
}
