mod plot_surface;

use anyhow::Context;
use clap::Parser;
use gui::core::gui::RoadView;
use plot_surface::PlotSurface;
use plotters::prelude::*;
use roadsim::core::handle_drive::{handle_drive, Drive};
use roadsim::core::session::Session;
use roadsim::core::track::Track;
use roadsim::interfaces::gui_interface::DriveState;
use roadsim::post::track_export::write_track_csv;
use roadsim::pre::read_sim_pars::{read_sim_pars, SimPars};
use roadsim::pre::sim_opts::SimOpts;
use roadsim::render::palette::Palette;
use roadsim::render::sprites::ProceduralSprites;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// export_frame renders the current drive state into a PNG file.
fn export_frame(
    session: &mut Session,
    track: &Track,
    drive_state: &DriveState,
    sprites: &ProceduralSprites,
    filepath: &Path,
) -> anyhow::Result<()> {
    let viewport = session.renderer().viewport();
    let root = BitMapBackend::new(
        filepath,
        (viewport.width.round() as u32, viewport.height.round() as u32),
    )
    .into_drawing_area();

    let no_failed = {
        let mut surface = PlotSurface::new(&root);
        session.tick(
            track,
            &drive_state.player,
            &drive_state.rivals,
            sprites,
            &mut surface,
        );
        surface.no_failed()
    };

    if no_failed > 0 {
        tracing::warn!(
            "{} primitives could not be drawn into {}",
            no_failed,
            filepath.display()
        );
    }

    root.present()
        .context(format!("Failed to write frame file {}!", filepath.display()))?;
    Ok(())
}

/// run_headless drives the autopilot without GUI and exports every n-th frame as PNG file.
fn run_headless(
    sim_opts: &SimOpts,
    sim_pars: &SimPars,
    track: &Track,
    palette: &Palette,
) -> anyhow::Result<()> {
    let mut session = Session::new(&sim_pars.camera_pars, &sim_pars.render_pars, palette)?;
    let mut drive = Drive::new(&sim_pars.drive_pars, track);
    let sprites = ProceduralSprites::new();
    let mut no_exported = 0;

    for cur_step in 0..sim_opts.no_steps {
        drive.step(track, sim_opts.timestep_size);

        if sim_opts.export_every > 0 && cur_step % sim_opts.export_every == 0 {
            let filepath = sim_opts
                .output_dir
                .join(format!("frame_{:06}.png", cur_step));
            export_frame(
                &mut session,
                track,
                &drive.get_drive_state(),
                &sprites,
                &filepath,
            )?;
            no_exported += 1;
        }
    }

    tracing::info!(
        "Exported {} frames to {} (drive time {:.1}s)",
        no_exported,
        sim_opts.output_dir.display(),
        drive.drive_time()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get simulation options from the command line arguments
    let sim_opts: SimOpts = SimOpts::parse();

    // initialize logging
    let default_level = if sim_opts.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    // get simulation parameters
    let sim_pars = if let Some(parfile_path) = &sim_opts.parfile_path {
        tracing::info!("Reading parameters from {}", parfile_path.display());
        read_sim_pars(parfile_path)?
    } else {
        tracing::info!("No parameter file provided, using default parameters");
        SimPars::default()
    };

    let palette = Palette::from_pars(&sim_pars.palette)?;
    let track = Arc::new(Track::from_seed(
        &sim_pars.track_pars,
        &palette,
        sim_opts.seed,
    )?);

    if sim_opts.export_track || !sim_opts.gui {
        std::fs::create_dir_all(&sim_opts.output_dir).context(format!(
            "Failed to create output directory {}!",
            sim_opts.output_dir.display()
        ))?;
    }

    if sim_opts.export_track {
        write_track_csv(&track, &sim_opts.output_dir.join("track.csv"))?;
    }

    // EXECUTION -----------------------------------------------------------------------------------
    if !sim_opts.gui {
        // NON-GUI CASE
        tracing::info!("Driving {} time steps without GUI...", sim_opts.no_steps);
        let t_start = Instant::now();

        run_headless(&sim_opts, &sim_pars, &track, &palette)?;

        tracing::info!("Execution time: {}ms", t_start.elapsed().as_millis());
    } else {
        // GUI CASE
        tracing::info!("Starting GUI drive...");

        // create channel for the communication between drive thread and GUI
        let (tx, rx) = flume::unbounded();

        // the drive runs in its own thread, the GUI must run in the main thread
        let drive_pars_thread = sim_pars.drive_pars.clone();
        let track_thread = Arc::clone(&track);
        let timestep_size = sim_opts.timestep_size;
        let realtime_factor = sim_opts.realtime_factor;

        let _ = thread::spawn(move || {
            if let Err(err) = handle_drive(
                &drive_pars_thread,
                &track_thread,
                timestep_size,
                &tx,
                realtime_factor,
                None,
            ) {
                tracing::error!("Drive stopped: {:#}", err);
            }
        });

        let gui = RoadView::new(rx, track, &sim_pars)?;
        let native_options = eframe::NativeOptions {
            initial_window_size: Some(eframe::egui::Vec2::new(
                sim_pars.render_pars.viewport.width as f32,
                sim_pars.render_pars.viewport.height as f32,
            )),
            ..eframe::NativeOptions::default()
        };
        eframe::run_native(Box::new(gui), native_options);
    }

    Ok(())
}
