use crate::core::autopilot::DrivePars;
use crate::core::camera::CameraPars;
use crate::core::track::TrackPars;
use crate::render::palette::PalettePars;
use crate::render::scene::RenderPars;
use anyhow::Context;
use serde::Deserialize;
use std::fs::OpenOptions;
use std::path::Path;

/// SimPars is used to store all other parameter structs. Missing entries are filled with their
/// defaults, such that an empty JSON object is a valid parameter file.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SimPars {
    pub track_pars: TrackPars,
    pub camera_pars: CameraPars,
    pub render_pars: RenderPars,
    pub palette: PalettePars,
    pub drive_pars: DrivePars,
}

/// read_sim_pars reads the JSON file and decodes the JSON string into the simulation parameters
/// struct.
pub fn read_sim_pars(filepath: &Path) -> anyhow::Result<SimPars> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open parameter file {}!",
            filepath.display()
        ))?;
    let pars = serde_json::from_reader(&fh).context(format!(
        "Failed to parse parameter file {}!",
        filepath.display()
    ))?;
    Ok(pars)
}
