pub mod lock_state;
pub mod track_session;
pub mod zone_mapper;
