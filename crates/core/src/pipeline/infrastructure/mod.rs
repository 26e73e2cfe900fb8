pub mod follow_me_service;
