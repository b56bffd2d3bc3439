use flume::Receiver;
use roadsim::interfaces::gui_interface::DriveState;

#[derive(Debug)]
pub struct RoadsimInterface {
    pub rx: Receiver<DriveState>,
    pub drive_state: DriveState,
    pub connected: bool,
}

impl RoadsimInterface {
    pub fn new(rx: Receiver<DriveState>) -> RoadsimInterface {
        RoadsimInterface {
            rx,
            drive_state: Default::default(),
            connected: true,
        }
    }

    /// update drains the channel and keeps the latest drive state. Returns true if a new state
    /// was received.
    pub fn update(&mut self) -> bool {
        let mut received = false;

        for drive_state in self.rx.try_iter() {
            self.drive_state = drive_state;
            received = true;
        }

        if self.connected && self.rx.is_disconnected() && self.rx.is_empty() {
            tracing::info!("Drive finished, showing last state");
            self.connected = false;
        }

        received
    }
}
