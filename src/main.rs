use anyhow::{ensure, Result};
use log::info;
use std::{path::PathBuf, process};
use structopt::StructOpt;

use backends::DockerBackend;
use console::Console;
use controller::Controller;
use frontends::BuildFileFrontend;
use runner::ScriptRunner;
use services::ConfigFrontend;
use store::ImageStore;

mod backends;
mod console;
mod controller;
mod frontends;
mod models;
mod runner;
mod services;
mod store;
mod validation;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "build-images",
    about = "Builds, checks and tags a set of versioned container images."
)]
struct Opt {
    /// A yaml file containing the configuration of the images to build.
    #[structopt(parse(from_os_str))]
    config: PathBuf,

    /// Directory holding one module directory per version.
    #[structopt(long, parse(from_os_str), default_value = "modules/mandrel")]
    modules_dir: PathBuf,
}

fn main() {
    pretty_env_logger::init_custom_env("LOG");

    let opt = Opt::from_args();

    if let Err(err) = run(opt) {
        if Console::stdout().error(format!("{:#}", err)).is_err() {
            eprintln!("{:#}", err);
        }
        process::exit(-1);
    }
}

fn run(opt: Opt) -> Result<()> {
    ensure!(
        opt.config.is_file(),
        "The configuration file {} does not exist - exiting",
        validation::absolute(&opt.config).display()
    );

    let mut frontend = BuildFileFrontend::new();
    let configuration = frontend.configuration(&opt.config)?;
    info!("parsed configuration {:?}", opt.config);

    validation::validate(&configuration, &opt.modules_dir)?;
    info!("validated configuration");

    let backend = DockerBackend::connect()?;
    info!("connected to the container runtime");

    let store = ImageStore::new(backend, Console::stdout());
    let runner = ScriptRunner::new(&configuration.build_script);

    let mut controller = Controller::init(configuration, store, runner, Console::stdout());
    controller.run()?;
    info!("controller finished in phase {:?}", controller.phase());

    Ok(())
}
