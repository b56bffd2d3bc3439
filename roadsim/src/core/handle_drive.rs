use crate::core::autopilot::{Autopilot, DrivePars};
use crate::core::track::Track;
use crate::interfaces::gui_interface::{DriveState, MAX_GUI_UPDATE_FREQUENCY};
use flume::Sender;
use std::thread::sleep;
use std::time::{Duration, Instant};

/// Drive holds the player and rival vehicles and moves them in discrete time steps.
#[derive(Debug, Clone)]
pub struct Drive {
    player: Autopilot,
    rivals: Vec<Autopilot>,
    drive_time: f64,
}

impl Drive {
    pub fn new(drive_pars: &DrivePars, track: &Track) -> Drive {
        Drive {
            player: Autopilot::new(drive_pars, 0.0),
            rivals: Autopilot::rivals(drive_pars, track),
            drive_time: 0.0,
        }
    }

    pub fn step(&mut self, track: &Track, timestep_size: f64) {
        self.player.step(track, timestep_size);
        for rival in self.rivals.iter_mut() {
            rival.step(track, timestep_size);
        }
        self.drive_time += timestep_size;
    }

    pub fn drive_time(&self) -> f64 {
        self.drive_time
    }

    pub fn get_drive_state(&self) -> DriveState {
        DriveState {
            player: self.player.state(),
            rivals: self.rivals.iter().map(|r| r.state()).collect(),
            drive_time: self.drive_time,
        }
    }
}

/// handle_drive moves the vehicles in real-time (scaled by the real-time factor) and sends their
/// states to the GUI. It returns when `no_steps` time steps were simulated (if set) or when the
/// receiving side of the channel was dropped, i.e. the GUI was closed.
pub fn handle_drive(
    drive_pars: &DrivePars,
    track: &Track,
    timestep_size: f64,
    tx: &Sender<DriveState>,
    realtime_factor: f64,
    no_steps: Option<u64>,
) -> anyhow::Result<()> {
    if !(timestep_size > 0.0) || !(realtime_factor > 0.0) {
        anyhow::bail!(
            "Time step size and real-time factor must be positive, but are {} and {}!",
            timestep_size,
            realtime_factor
        );
    }

    let mut drive = Drive::new(drive_pars, track);
    let mut t_drive_update_gui = f64::NEG_INFINITY;
    let mut t_drive_update_print = 0.0;
    let mut cur_step = 0u64;

    tracing::info!(
        "Starting real-time drive with a time step size of {:.3}s",
        timestep_size
    );

    while no_steps.map_or(true, |no_steps| cur_step < no_steps) {
        let t_start = Instant::now();
        drive.step(track, timestep_size);
        cur_step += 1;

        if drive.drive_time() > t_drive_update_print + 0.9999 {
            tracing::debug!(
                "Driving... Current drive time is {:.3}s, player is at {:.0}m",
                drive.drive_time(),
                drive.get_drive_state().player.z
            );
            t_drive_update_print = drive.drive_time();
        }

        if drive.drive_time() > t_drive_update_gui + 1.0 / MAX_GUI_UPDATE_FREQUENCY - 0.001 {
            // send current drive state, a failed send means that the GUI is gone
            if tx.send(drive.get_drive_state()).is_err() {
                tracing::info!("GUI closed, stopping drive");
                return Ok(());
            }
            t_drive_update_gui = drive.drive_time();
        }

        // sleep until time step is finished in real-time as well (calculation in ms)
        let t_sleep = (timestep_size * 1000.0 / realtime_factor) as i64
            - t_start.elapsed().as_millis() as i64;

        if t_sleep > 0 {
            sleep(Duration::from_millis(t_sleep as u64));
        } else {
            tracing::warn!("Could not keep up with real-time!");
        }
    }

    Ok(())
}
