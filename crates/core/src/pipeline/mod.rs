pub mod follow_me_config;
pub mod follow_me_use_case;
pub mod infrastructure;
pub mod session_logger;
