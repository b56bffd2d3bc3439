use crate::error::ConfigError;
use crate::render::palette::Palette;
use crate::render::surface::RgbColor;
use helpers::general::{nearest_wrap_delta, wrap_f64, wrap_index};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Bernoulli, Distribution, Uniform};
use serde::{Deserialize, Serialize};

/// * `straight_margin` - Number of segments at the start and at the end of the track that are
/// kept straight
/// * `curve_probability` - Probability per segment that a new curvature delta is drawn
/// * `max_curve_delta` - (1/m) Curvature deltas are drawn uniformly from [-max, max]
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CurvePars {
    pub straight_margin: usize,
    pub curve_probability: f64,
    pub max_curve_delta: f64,
}

impl Default for CurvePars {
    fn default() -> Self {
        CurvePars {
            straight_margin: 20,
            curve_probability: 0.05,
            max_curve_delta: 0.0025,
        }
    }
}

/// * `stride` - Decorations are considered every `stride` segments
/// * `exclusion_margin` - Number of segments around the start/finish line without decorations
/// * `offset_factor` - Lateral offset from the road center as a multiple of the track width
/// * `kinds` - Image keys to choose from for each placement
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DecorationPars {
    pub stride: usize,
    pub exclusion_margin: usize,
    pub offset_factor: f64,
    pub kinds: Vec<String>,
}

impl Default for DecorationPars {
    fn default() -> Self {
        DecorationPars {
            stride: 20,
            exclusion_margin: 50,
            offset_factor: 0.8,
            kinds: vec!["tree1".to_owned(), "bush1".to_owned()],
        }
    }
}

/// * `segment_count` - Number of segments of the closed loop
/// * `segment_length` - (m) Length of a single segment
/// * `track_width` - (m) Width of the road
/// * `rumble_length` - Number of segments per color band
/// * `curves` - Curve generation parameters
/// * `decorations` - Roadside decoration parameters
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TrackPars {
    pub segment_count: usize,
    pub segment_length: f64,
    pub track_width: f64,
    pub rumble_length: usize,
    pub curves: CurvePars,
    pub decorations: DecorationPars,
}

impl Default for TrackPars {
    fn default() -> Self {
        TrackPars {
            segment_count: 1000,
            segment_length: 100.0,
            track_width: 500.0,
            rumble_length: 3,
            curves: CurvePars::default(),
            decorations: DecorationPars::default(),
        }
    }
}

impl TrackPars {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segment_count == 0 {
            return Err(ConfigError::NonPositiveSegmentCount);
        }
        if !(self.segment_length > 0.0) || !self.segment_length.is_finite() {
            return Err(ConfigError::NonPositiveSegmentLength(self.segment_length));
        }
        if !(self.track_width > 0.0) || !self.track_width.is_finite() {
            return Err(ConfigError::NonPositiveTrackWidth(self.track_width));
        }
        if self.rumble_length == 0 {
            return Err(ConfigError::NonPositiveRumbleLength);
        }
        if !(0.0..=1.0).contains(&self.curves.curve_probability) {
            return Err(ConfigError::InvalidCurveProbability(
                self.curves.curve_probability,
            ));
        }
        if !(self.curves.max_curve_delta >= 0.0) || !self.curves.max_curve_delta.is_finite() {
            return Err(ConfigError::InvalidCurveDelta(self.curves.max_curve_delta));
        }
        if self.decorations.stride == 0 {
            return Err(ConfigError::NonPositiveDecorationStride);
        }
        if self.decorations.kinds.is_empty() {
            return Err(ConfigError::NoDecorationKinds);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Point3 {
        Point3 { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Roadside object attached to a segment. `offset` is measured from the road center, negative
/// values are left of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoration {
    pub image_key: String,
    pub offset: f64,
    pub side: Side,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub left: Point3,
    pub right: Point3,
    pub road_color: RgbColor,
    pub grass_color: RgbColor,
    pub curvature: f64,
    pub decoration: Option<Decoration>,
}

impl Segment {
    pub fn center_x(&self) -> f64 {
        (self.left.x + self.right.x) / 2.0
    }

    pub fn z(&self) -> f64 {
        self.left.z
    }
}

/// band_is_light returns true if the segment with the given index belongs to a light color band.
pub fn band_is_light(index: usize, rumble_length: usize) -> bool {
    (index / rumble_length) % 2 == 0
}

#[derive(Debug)]
pub struct Track {
    segments: Vec<Segment>,
    segment_length: f64,
    track_width: f64,
    rumble_length: usize,
    total_length: f64,
}

impl Track {
    /// generate builds the closed loop segment by segment in increasing z. All randomness
    /// (curves and decorations) is drawn from the inserted random number generator, such that a
    /// seeded generator yields a reproducible track.
    pub fn generate<R: Rng + ?Sized>(
        track_pars: &TrackPars,
        palette: &Palette,
        rng: &mut R,
    ) -> Result<Track, ConfigError> {
        track_pars.validate()?;

        let n = track_pars.segment_count;
        let seg_len = track_pars.segment_length;
        let half_width = track_pars.track_width / 2.0;
        let margin = track_pars.curves.straight_margin;

        let curve_dist = Bernoulli::new(track_pars.curves.curve_probability)
            .map_err(|_| ConfigError::InvalidCurveProbability(track_pars.curves.curve_probability))?;
        let delta_dist = Uniform::new_inclusive(
            -track_pars.curves.max_curve_delta,
            track_pars.curves.max_curve_delta,
        );

        // CREATE SEGMENTS -------------------------------------------------------------------------
        let mut segments = Vec::with_capacity(n);
        let mut x_center = 0.0;
        let mut drift = 0.0;

        for i in 0..n {
            let z = i as f64 * seg_len;

            // the drift is only applied outside the straight margins, it shifts the following
            // segments
            let curvature = if i >= margin && i + margin < n {
                if curve_dist.sample(rng) {
                    drift += delta_dist.sample(rng);
                }
                drift
            } else {
                0.0
            };

            let light = band_is_light(i, track_pars.rumble_length);

            segments.push(Segment {
                index: i,
                left: Point3::new(x_center - half_width, 0.0, z),
                right: Point3::new(x_center + half_width, 0.0, z),
                road_color: if light { palette.road_light } else { palette.road_dark },
                grass_color: if light { palette.grass_light } else { palette.grass_dark },
                curvature,
                decoration: None,
            });

            x_center += curvature * seg_len;
        }

        // START AND FINISH LINE -------------------------------------------------------------------
        let markers = [
            (0, palette.rumble_white, palette.grass_light),
            (1, palette.rumble_red, palette.grass_light),
            (n as i64 - 2, palette.rumble_red, palette.grass_dark),
            (n as i64 - 1, palette.rumble_white, palette.grass_dark),
        ];

        for &(idx, road_color, grass_color) in markers.iter() {
            if idx >= 0 && (idx as usize) < n {
                let segment = &mut segments[idx as usize];
                segment.road_color = road_color;
                segment.grass_color = grass_color;
            }
        }

        // DECORATIONS -----------------------------------------------------------------------------
        let deco_pars = &track_pars.decorations;
        let offset = track_pars.track_width * deco_pars.offset_factor;

        for i in (0..n).step_by(deco_pars.stride) {
            if Track::in_exclusion_margin(i, n, deco_pars.exclusion_margin) {
                continue;
            }

            let side = if rng.gen_bool(0.5) { Side::Left } else { Side::Right };
            let image_key = match deco_pars.kinds.choose(rng) {
                Some(kind) => kind.to_owned(),
                None => continue,
            };

            segments[i].decoration = Some(Decoration {
                image_key,
                offset: match side {
                    Side::Left => -offset,
                    Side::Right => offset,
                },
                side,
            });
        }

        let no_decorations = segments.iter().filter(|s| s.decoration.is_some()).count();
        tracing::info!(
            "Track generated with {} segments ({:.0}m, {} decorations)",
            n,
            n as f64 * seg_len,
            no_decorations
        );

        Ok(Track {
            segments,
            segment_length: seg_len,
            track_width: track_pars.track_width,
            rumble_length: track_pars.rumble_length,
            total_length: n as f64 * seg_len,
        })
    }

    /// from_seed generates a track using a standard generator seeded with the given seed, or from
    /// system entropy if no seed is given.
    pub fn from_seed(
        track_pars: &TrackPars,
        palette: &Palette,
        seed: Option<u64>,
    ) -> Result<Track, ConfigError> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Track::generate(track_pars, palette, &mut rng)
    }

    /// in_exclusion_margin returns true if the index lies within `margin` segments of the start
    /// or of the end of the loop.
    pub fn in_exclusion_margin(idx: usize, segment_count: usize, margin: usize) -> bool {
        idx < margin || idx + margin >= segment_count
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn segment_length(&self) -> f64 {
        self.segment_length
    }

    pub fn track_width(&self) -> f64 {
        self.track_width
    }

    pub fn rumble_length(&self) -> usize {
        self.rumble_length
    }

    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// normalize_z maps any distance into [0.0, total_length[.
    pub fn normalize_z(&self, z: f64) -> f64 {
        wrap_f64(z, self.total_length)
    }

    /// get_segment returns the segment containing the distance z. Distances outside the loop are
    /// wrapped, non-finite distances resolve to the first segment.
    pub fn get_segment(&self, z: f64) -> &Segment {
        let idx = (self.normalize_z(z) / self.segment_length).floor() as usize;
        // division may round up to the segment count for distances just below the total length
        &self.segments[idx.min(self.segments.len() - 1)]
    }

    /// get_segment_by_index returns the segment at the given index, wrapped into the loop.
    pub fn get_segment_by_index(&self, idx: i64) -> &Segment {
        &self.segments[wrap_index(idx, self.segments.len())]
    }

    /// relative_z returns the distance from the camera to a segment start z, taking the shorter
    /// way around the loop.
    pub fn relative_z(&self, segment_z: f64, camera_z: f64) -> f64 {
        nearest_wrap_delta(camera_z, segment_z, self.total_length)
    }

    /// road_bounds returns the lateral positions of the left and right road edge at distance z.
    pub fn road_bounds(&self, z: f64) -> (f64, f64) {
        let segment = self.get_segment(z);
        (segment.left.x, segment.right.x)
    }

    /// clamp_to_road keeps a body of the given half width between the road edges at distance z.
    /// It returns the (possibly) corrected lateral position and whether a correction was
    /// necessary, i.e. whether the body was off the road.
    pub fn clamp_to_road(&self, x: f64, z: f64, half_width: f64) -> (f64, bool) {
        let (left, right) = self.road_bounds(z);

        if x - half_width < left {
            (left + half_width, true)
        } else if x + half_width > right {
            (right - half_width, true)
        } else {
            (x, false)
        }
    }
}
