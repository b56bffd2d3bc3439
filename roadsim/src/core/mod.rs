pub mod autopilot;
pub mod camera;
pub mod handle_drive;
pub mod projection;
pub mod session;
pub mod track;
