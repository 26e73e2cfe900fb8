pub mod command;
pub mod detection;
pub mod heartbeat;
pub mod pipeline;
pub mod selection;
pub mod shared;
pub mod tracking;
pub mod video;
