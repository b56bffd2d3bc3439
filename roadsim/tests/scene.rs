use approx::assert_abs_diff_eq;
use roadsim::core::camera::{Camera, CameraPars};
use roadsim::core::projection::Projector;
use roadsim::core::track::{CurvePars, Point3, Track, TrackPars};
use roadsim::render::minimap::{EntityKind, MinimapEntity};
use roadsim::render::palette::Palette;
use roadsim::render::scene::{CenterLine, RenderPars, SceneRenderer};
use roadsim::render::sprites::{ImageSource, ProceduralSprites};
use roadsim::render::surface::{
    DrawCommand, RecordingSurface, RgbColor, RgbaColor, ScreenPoint, ScreenRect,
};
use std::collections::HashSet;

fn straight_track(palette: &Palette) -> Track {
    let pars = TrackPars {
        curves: CurvePars {
            curve_probability: 0.0,
            ..CurvePars::default()
        },
        ..TrackPars::default()
    };
    Track::from_seed(&pars, palette, Some(21)).unwrap()
}

/// short_straight_track returns a straight loop without decorations that is shorter than the
/// default draw window.
fn short_straight_track(segment_count: usize, palette: &Palette) -> Track {
    let pars = TrackPars {
        segment_count,
        curves: CurvePars {
            curve_probability: 0.0,
            ..CurvePars::default()
        },
        ..TrackPars::default()
    };
    Track::from_seed(&pars, palette, Some(21)).unwrap()
}

/// low_camera_at returns a camera whose nearest strips are on screen.
fn low_camera_at(z: f64, track: &Track) -> Camera {
    let pars = CameraPars {
        depth: 0.1,
        ..CameraPars::default()
    };
    let mut camera = Camera::new(&pars).unwrap();
    camera.update(z, 0.0, track.total_length());
    camera
}

fn camera_at(z: f64, x: f64, track: &Track) -> Camera {
    let mut camera = Camera::new(&CameraPars::default()).unwrap();
    camera.update(z, x, track.total_length());
    camera
}

fn render(track: &Track, camera: &Camera, images: &dyn ImageSource) -> RecordingSurface {
    let mut renderer = SceneRenderer::new(&RenderPars::default(), &Palette::default()).unwrap();
    let mut rec = RecordingSurface::new();
    renderer.draw(track, camera, images, &mut rec);
    rec
}

fn is_color(color: &RgbaColor, rgb: RgbColor) -> bool {
    color.r == rgb.r && color.g == rgb.g && color.b == rgb.b
}

/// road_widths returns the near edge width of every road polygon in draw order.
fn road_widths(rec: &RecordingSurface, palette: &Palette) -> Vec<f64> {
    rec.commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Polygon { points, color }
                if is_color(color, palette.road_light) || is_color(color, palette.road_dark) =>
            {
                Some(points[1].x - points[0].x)
            }
            _ => None,
        })
        .collect()
}

#[test]
fn sky_is_painted_first() {
    let palette = Palette::default();
    let track = straight_track(&palette);
    let rec = render(&track, &camera_at(0.0, 0.0, &track), &ProceduralSprites::new());

    assert_eq!(
        rec.commands[0],
        DrawCommand::Rect {
            rect: ScreenRect::new(0.0, 0.0, 1280.0, 720.0),
            color: palette.sky.into(),
        }
    );
}

#[test]
fn strips_are_painted_from_far_to_near() {
    let palette = Palette::default();
    let track = straight_track(&palette);
    let rec = render(&track, &camera_at(0.0, 0.0, &track), &ProceduralSprites::new());

    let widths = road_widths(&rec, &palette);
    assert!(widths.len() > 100);
    for pair in widths.windows(2) {
        assert!(pair[1] > pair[0]);
    }
}

#[test]
fn painter_order_survives_the_wrap() {
    let palette = Palette::default();
    let track = straight_track(&palette);
    let camera = camera_at(track.total_length() - 50.0, 0.0, &track);
    let rec = render(&track, &camera, &ProceduralSprites::new());

    let widths = road_widths(&rec, &palette);
    assert!(widths.len() > 100);
    for pair in widths.windows(2) {
        assert!(pair[1] > pair[0]);
    }
}

#[test]
fn fog_thins_out_toward_the_camera() {
    let palette = Palette::default();
    let track = straight_track(&palette);
    let rec = render(&track, &camera_at(0.0, 0.0, &track), &ProceduralSprites::new());

    let alphas: Vec<f64> = rec
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Rect { color, .. } if is_color(color, palette.fog) => Some(color.a),
            _ => None,
        })
        .collect();

    assert!(!alphas.is_empty());
    for pair in alphas.windows(2) {
        assert!(pair[1] <= pair[0]);
    }
    // strips at and beyond the fog distance are fully fogged
    assert_eq!(alphas[0], 1.0);
    assert!(alphas[alphas.len() - 1] < 0.1);
    assert!(alphas.iter().all(|&a| a > 0.0 && a <= 1.0));
}

#[test]
fn decorations_stand_on_their_ground_point() {
    let palette = Palette::default();
    let track = straight_track(&palette);
    let camera = camera_at(0.0, 0.0, &track);
    let sprites = ProceduralSprites::new();
    let rec = render(&track, &camera, &sprites);
    let proj = Projector::new(&camera, RenderPars::default().viewport);

    let images: Vec<(&String, &ScreenRect)> = rec
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Image { key, rect } => Some((key, rect)),
            _ => None,
        })
        .collect();
    assert!(!images.is_empty());

    // decorated segments in view, from far to near
    let decorated: Vec<_> = track
        .segments()
        .iter()
        .take(310)
        .filter(|s| s.decoration.is_some())
        .rev()
        .collect();
    assert_eq!(images.len(), decorated.len());

    for ((key, rect), segment) in images.iter().zip(decorated.iter()) {
        let deco = segment.decoration.as_ref().unwrap();
        assert_eq!(*key, &deco.image_key);

        let mid_z = segment.z() + 50.0;
        let ground = proj
            .project(&Point3::new(segment.center_x() + deco.offset, 0.0, mid_z), mid_z)
            .unwrap();
        let size = sprites.image_size(key).unwrap();

        assert_abs_diff_eq!(rect.bottom(), ground.screen_y, epsilon = 1e-6);
        assert_abs_diff_eq!(rect.x + rect.width / 2.0, ground.screen_x, epsilon = 1e-6);
        assert_abs_diff_eq!(rect.height, size.height * 3.0 * ground.scale, epsilon = 1e-6);
    }

    // nearer decorations of the same kind are larger
    let tree_heights: Vec<f64> = images
        .iter()
        .filter(|(key, _)| key.as_str() == "tree1")
        .map(|(_, rect)| rect.height)
        .collect();
    for pair in tree_heights.windows(2) {
        assert!(pair[1] > pair[0]);
    }
}

#[test]
fn unavailable_images_are_skipped() {
    let palette = Palette::default();
    let track = straight_track(&palette);
    let camera = camera_at(0.0, 0.0, &track);
    let sprites = ProceduralSprites::new().without("tree1").without("bush1");

    let mut renderer = SceneRenderer::new(&RenderPars::default(), &palette).unwrap();
    let mut rec = RecordingSurface::new();
    renderer.draw(&track, &camera, &sprites, &mut rec);
    let first_len = rec.commands.len();

    assert!(!rec
        .commands
        .iter()
        .any(|c| matches!(c, DrawCommand::Image { .. })));
    assert!(!road_widths(&rec, &palette).is_empty());

    // the next frame draws the same way
    rec.clear();
    renderer.draw(&track, &camera, &sprites, &mut rec);
    assert_eq!(rec.commands.len(), first_len);
}

#[test]
fn strips_behind_the_eye_are_skipped() {
    let palette = Palette::default();
    let track = straight_track(&palette);
    let pars = CameraPars {
        height: 10.0,
        ..CameraPars::default()
    };
    let mut camera = Camera::new(&pars).unwrap();
    camera.update(295.0, 0.0, track.total_length());

    let renderer = SceneRenderer::new(&RenderPars::default(), &palette).unwrap();
    let strips = renderer.build_strips(&track, &camera);

    assert!(strips.iter().all(|s| s.step != 0));
    assert!(strips.iter().any(|s| s.step == 1));

    let mut rec = RecordingSurface::new();
    let mut renderer = renderer;
    renderer.draw(&track, &camera, &ProceduralSprites::new(), &mut rec);
    assert_eq!(road_widths(&rec, &palette).len(), strips.len());
}

#[test]
fn strips_outside_the_viewport_are_culled() {
    let palette = Palette::default();
    let track = straight_track(&palette);
    let camera = camera_at(0.0, 0.0, &track);
    let renderer = SceneRenderer::new(&RenderPars::default(), &palette).unwrap();

    let strips = renderer.build_strips(&track, &camera);
    let window = renderer.visible_count(&track) + RenderPars::default().overscan;

    assert!(strips.len() < window);
    for strip in strips.iter() {
        let top = strip.near_y().min(strip.far_y());
        let bottom = strip.near_y().max(strip.far_y());
        assert!(bottom >= 0.0 && top < 720.0);
    }
}

#[test]
fn frame_contains_minimap_panel() {
    let palette = Palette::default();
    let track = straight_track(&palette);
    let camera = camera_at(500.0, 0.0, &track);
    let mut renderer = SceneRenderer::new(&RenderPars::default(), &palette).unwrap();
    let mut rec = RecordingSurface::new();

    let entities = [
        MinimapEntity {
            x: 0.0,
            z: 500.0,
            kind: EntityKind::Player,
        },
        MinimapEntity {
            x: 100.0,
            z: 50_000.0,
            kind: EntityKind::Rival,
        },
    ];
    renderer.draw_frame(&track, &camera, &entities, &ProceduralSprites::new(), &mut rec);

    let polylines: Vec<&DrawCommand> = rec
        .commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::Polyline { .. }))
        .collect();
    assert_eq!(polylines.len(), 2);

    for cmd in rec.commands.iter() {
        match cmd {
            DrawCommand::Polyline { points, .. } => {
                for p in points {
                    assert!(p.x >= 1070.0 && p.x <= 1270.0);
                    assert!(p.y >= 10.0 && p.y <= 160.0);
                }
            }
            DrawCommand::Circle { center, .. } => {
                assert!(center.x >= 1070.0 && center.x <= 1270.0);
                assert!(center.y >= 10.0 && center.y <= 160.0);
            }
            _ => {}
        }
    }

    // panel is drawn on top of the scene
    assert!(matches!(
        rec.commands.last(),
        Some(DrawCommand::Circle { .. })
    ));
}

#[test]
fn short_track_is_walked_once_from_far_to_near() {
    let palette = Palette::default();
    let track = short_straight_track(20, &palette);
    // camera sits in the last segment, such that the window crosses the wrap
    let camera = low_camera_at(track.total_length() - 50.0, &track);
    let renderer = SceneRenderer::new(&RenderPars::default(), &palette).unwrap();

    let strips = renderer.build_strips(&track, &camera);
    assert_eq!(strips.len(), 20);

    for pair in strips.windows(2) {
        assert!(pair[1].rel_z < pair[0].rel_z);
        assert!(pair[1].step < pair[0].step);
    }
    assert_abs_diff_eq!(strips[0].rel_z, 1850.0, epsilon = 1e-9);
    assert_abs_diff_eq!(strips[19].rel_z, -50.0, epsilon = 1e-9);
    assert_eq!(strips[19].segment.index, 19);
    assert_eq!(strips[18].segment.index, 0);

    let indices: HashSet<usize> = strips.iter().map(|s| s.segment.index).collect();
    assert_eq!(indices.len(), strips.len());
}

#[test]
fn far_half_of_the_window_is_drawn() {
    let palette = Palette::default();
    let track = short_straight_track(400, &palette);
    let camera = low_camera_at(0.0, &track);
    let renderer = SceneRenderer::new(&RenderPars::default(), &palette).unwrap();

    let strips = renderer.build_strips(&track, &camera);

    // draw distance plus overscan
    assert_eq!(strips.len(), 310);
    assert_abs_diff_eq!(strips[0].rel_z, 30_900.0, epsilon = 1e-9);
    for pair in strips.windows(2) {
        assert!(pair[1].rel_z < pair[0].rel_z);
    }
}

/// strip_layers splits a recorded scene into the commands of each strip (sky excluded). Every
/// strip starts with its opaque grass rectangle.
fn strip_layers(rec: &RecordingSurface, palette: &Palette) -> Vec<Vec<DrawCommand>> {
    let mut layers: Vec<Vec<DrawCommand>> = Vec::new();

    for cmd in rec.commands.iter().skip(1) {
        let starts_strip = matches!(
            cmd,
            DrawCommand::Rect { color, .. } if !is_color(color, palette.fog)
        );
        if starts_strip {
            layers.push(vec![cmd.clone()]);
        } else if let Some(last) = layers.last_mut() {
            last.push(cmd.clone());
        }
    }

    layers
}

fn polygon(cmd: &DrawCommand) -> (&Vec<ScreenPoint>, &RgbaColor) {
    match cmd {
        DrawCommand::Polygon { points, color } => (points, color),
        other => panic!("expected polygon, got {:?}", other),
    }
}

fn draw_short_track(center_line: CenterLine) -> (Track, Camera, RecordingSurface) {
    let palette = Palette::default();
    let track = short_straight_track(30, &palette);
    let camera = low_camera_at(150.0, &track);
    let pars = RenderPars {
        center_line,
        ..RenderPars::default()
    };
    let mut renderer = SceneRenderer::new(&pars, &palette).unwrap();
    let mut rec = RecordingSurface::new();
    renderer.draw(&track, &camera, &ProceduralSprites::new(), &mut rec);
    (track, camera, rec)
}

#[test]
fn strip_layers_have_the_configured_geometry() {
    let palette = Palette::default();
    let pars = RenderPars::default();
    let (track, camera, rec) = draw_short_track(CenterLine::Solid);
    let renderer = SceneRenderer::new(&pars, &palette).unwrap();
    let strips = renderer.build_strips(&track, &camera);
    let layers = strip_layers(&rec, &palette);

    assert_eq!(layers.len(), strips.len());
    assert!(!strips.is_empty());

    for (strip, layer) in strips.iter().zip(layers.iter()) {
        // grass spans the viewport between the strip's edges
        match &layer[0] {
            DrawCommand::Rect { rect, color } => {
                assert_eq!(*color, RgbaColor::from(strip.segment.grass_color));
                assert_abs_diff_eq!(rect.x, 0.0);
                assert_abs_diff_eq!(rect.width, 1280.0);
                assert_abs_diff_eq!(rect.y, strip.far_y().min(strip.near_y()), epsilon = 1e-9);
                assert_abs_diff_eq!(
                    rect.bottom(),
                    strip.far_y().max(strip.near_y()),
                    epsilon = 1e-9
                );
            }
            other => panic!("expected grass, got {:?}", other),
        }

        let (road, road_color) = polygon(&layer[1]);
        assert_eq!(*road_color, RgbaColor::from(strip.segment.road_color));
        assert_abs_diff_eq!(road[0].x, strip.near_left.screen_x, epsilon = 1e-9);
        assert_abs_diff_eq!(road[1].x, strip.near_right.screen_x, epsilon = 1e-9);

        // rumble strips hug the road edges in the color of the band
        let band_color = if strip.segment.index / track.rumble_length() % 2 == 0 {
            palette.rumble_white
        } else {
            palette.rumble_red
        };
        let rumble_near = strip.near_width() * pars.rumble_fraction;
        let rumble_far = strip.far_width() * pars.rumble_fraction;

        let (left, left_color) = polygon(&layer[2]);
        assert_eq!(*left_color, RgbaColor::from(band_color));
        assert_abs_diff_eq!(left[0].x, strip.near_left.screen_x, epsilon = 1e-9);
        assert_abs_diff_eq!(left[1].x - left[0].x, rumble_near, epsilon = 1e-9);
        assert_abs_diff_eq!(left[2].x - left[3].x, rumble_far, epsilon = 1e-9);

        let (right, right_color) = polygon(&layer[3]);
        assert_eq!(*right_color, RgbaColor::from(band_color));
        assert_abs_diff_eq!(right[1].x, strip.near_right.screen_x, epsilon = 1e-9);
        assert_abs_diff_eq!(right[1].x - right[0].x, rumble_near, epsilon = 1e-9);

        // center line is centered on the road
        let (line, line_color) = polygon(&layer[4]);
        assert_eq!(*line_color, RgbaColor::from(palette.center_line));
        let road_center = (strip.near_left.screen_x + strip.near_right.screen_x) / 2.0;
        assert_abs_diff_eq!(
            line[1].x - line[0].x,
            strip.near_width() * pars.center_line_fraction,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!((line[0].x + line[1].x) / 2.0, road_center, epsilon = 1e-9);
        assert_abs_diff_eq!(line[0].y, strip.near_y(), epsilon = 1e-9);
    }
}

#[test]
fn dashed_center_line_is_drawn_on_light_bands_only() {
    let palette = Palette::default();

    let center_lines = |rec: &RecordingSurface| -> usize {
        strip_layers(rec, &palette)
            .iter()
            .filter(|layer| {
                layer.len() > 4
                    && matches!(&layer[4], DrawCommand::Polygon { color, .. }
                        if is_color(color, palette.center_line))
            })
            .count()
    };

    let (track, camera, rec) = draw_short_track(CenterLine::Solid);
    let renderer = SceneRenderer::new(&RenderPars::default(), &palette).unwrap();
    let strips = renderer.build_strips(&track, &camera);
    assert_eq!(center_lines(&rec), strips.len());

    let (_, _, rec) = draw_short_track(CenterLine::Dashed);
    let light = strips
        .iter()
        .filter(|s| s.segment.index / track.rumble_length() % 2 == 0)
        .count();
    assert!(light > 0 && light < strips.len());
    assert_eq!(center_lines(&rec), light);
}
