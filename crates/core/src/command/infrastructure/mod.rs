pub mod recording_transport;
pub mod serial_device_transport;
