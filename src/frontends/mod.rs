mod build_file;

pub use build_file::BuildFileFrontend;
