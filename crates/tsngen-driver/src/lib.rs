//! Configuration-file loading and the end-to-end generation pipeline: read a [`Config`], run
//! the core generator, and export every output file.

use std::path::{Path, PathBuf};

use omnet_frontend::TsnExport;
use tsngen_core::{Spec, TestCase};

/// A full generator configuration: the core [`Spec`] plus output options.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// The generator specification.
    #[serde(flatten)]
    pub spec: Spec,
    /// Directory receiving the generated files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Whether to emit the OMNeT++ `Network.ned` and `omnetpp.ini` files.
    #[serde(default = "default_omnet_files")]
    pub omnet_files: bool,
}

impl Config {
    /// Loads a configuration from a file, keyed by its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let contents = std::fs::read_to_string(path)?;
                Ok(serde_json::from_str(&contents)?)
            }
            _ => Err(Error::UnknownFileType(path.into())),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("simulation_output")
}

fn default_omnet_files() -> bool {
    true
}

/// Generates a test case from a configuration file and writes the outputs.
pub fn run_from_file(config: impl AsRef<Path>) -> Result<TestCase, Error> {
    run(Config::from_file(config)?)
}

/// Runs the generator for `config` and writes its outputs into `config.output_dir`.
pub fn run(config: Config) -> Result<TestCase, Error> {
    let test_case = tsngen_core::run(config.spec)?;
    TsnExport::builder()
        .data_dir(config.output_dir)
        .test_case(test_case.clone())
        .omnet_files(config.omnet_files)
        .build()
        .write()?;
    Ok(test_case)
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown file type: {0}")]
    UnknownFileType(PathBuf),

    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("failed to generate the test case")]
    Core(#[from] tsngen_core::Error),

    #[error("failed to export the test case")]
    Export(#[from] omnet_frontend::Error),
}
