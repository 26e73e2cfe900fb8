pub mod scenario;
pub mod scripted_frame_source;
