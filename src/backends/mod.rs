mod docker;
#[cfg(test)]
mod memory;

pub use docker::DockerBackend;
#[cfg(test)]
pub use memory::{Call, MemoryBackend};
