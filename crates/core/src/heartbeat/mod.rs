pub mod heartbeat_emitter;
