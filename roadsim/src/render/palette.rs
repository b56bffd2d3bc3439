use crate::error::ConfigError;
use crate::render::surface::RgbColor;
use serde::Deserialize;

/// Colors as CSS color strings (e.g. "#6B6B6B"), as found in the parameter file.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PalettePars {
    pub road_light: String,
    pub road_dark: String,
    pub grass_light: String,
    pub grass_dark: String,
    pub rumble_white: String,
    pub rumble_red: String,
    pub center_line: String,
    pub fog: String,
    pub sky: String,
    pub minimap_background: String,
    pub minimap_edge: String,
    pub minimap_player: String,
    pub minimap_rival: String,
}

impl Default for PalettePars {
    fn default() -> Self {
        PalettePars {
            road_light: "#6B6B6B".to_owned(),
            road_dark: "#626262".to_owned(),
            grass_light: "#106B10".to_owned(),
            grass_dark: "#0A400A".to_owned(),
            rumble_white: "#FFFFFF".to_owned(),
            rumble_red: "#BB0000".to_owned(),
            center_line: "#FFFFFF".to_owned(),
            fog: "#ADD8E6".to_owned(),
            sky: "#87CEEB".to_owned(),
            minimap_background: "#000000".to_owned(),
            minimap_edge: "#FFFFFF".to_owned(),
            minimap_player: "#0000FF".to_owned(),
            minimap_rival: "#FF0000".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub road_light: RgbColor,
    pub road_dark: RgbColor,
    pub grass_light: RgbColor,
    pub grass_dark: RgbColor,
    pub rumble_white: RgbColor,
    pub rumble_red: RgbColor,
    pub center_line: RgbColor,
    pub fog: RgbColor,
    pub sky: RgbColor,
    pub minimap_background: RgbColor,
    pub minimap_edge: RgbColor,
    pub minimap_player: RgbColor,
    pub minimap_rival: RgbColor,
}

fn parse_color(name: &'static str, value: &str) -> Result<RgbColor, ConfigError> {
    let color = value
        .parse::<css_color_parser::Color>()
        .map_err(|_| ConfigError::InvalidColor {
            name,
            value: value.to_owned(),
        })?;

    Ok(RgbColor::new(color.r, color.g, color.b))
}

impl Palette {
    pub fn from_pars(pars: &PalettePars) -> Result<Palette, ConfigError> {
        Ok(Palette {
            road_light: parse_color("road_light", &pars.road_light)?,
            road_dark: parse_color("road_dark", &pars.road_dark)?,
            grass_light: parse_color("grass_light", &pars.grass_light)?,
            grass_dark: parse_color("grass_dark", &pars.grass_dark)?,
            rumble_white: parse_color("rumble_white", &pars.rumble_white)?,
            rumble_red: parse_color("rumble_red", &pars.rumble_red)?,
            center_line: parse_color("center_line", &pars.center_line)?,
            fog: parse_color("fog", &pars.fog)?,
            sky: parse_color("sky", &pars.sky)?,
            minimap_background: parse_color("minimap_background", &pars.minimap_background)?,
            minimap_edge: parse_color("minimap_edge", &pars.minimap_edge)?,
            minimap_player: parse_color("minimap_player", &pars.minimap_player)?,
            minimap_rival: parse_color("minimap_rival", &pars.minimap_rival)?,
        })
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            road_light: RgbColor::new(0x6B, 0x6B, 0x6B),
            road_dark: RgbColor::new(0x62, 0x62, 0x62),
            grass_light: RgbColor::new(0x10, 0x6B, 0x10),
            grass_dark: RgbColor::new(0x0A, 0x40, 0x0A),
            rumble_white: RgbColor::new(0xFF, 0xFF, 0xFF),
            rumble_red: RgbColor::new(0xBB, 0x00, 0x00),
            center_line: RgbColor::new(0xFF, 0xFF, 0xFF),
            fog: RgbColor::new(0xAD, 0xD8, 0xE6),
            sky: RgbColor::new(0x87, 0xCE, 0xEB),
            minimap_background: RgbColor::new(0, 0, 0),
            minimap_edge: RgbColor::new(0xFF, 0xFF, 0xFF),
            minimap_player: RgbColor::new(0, 0, 0xFF),
            minimap_rival: RgbColor::new(0xFF, 0, 0),
        }
    }
}
