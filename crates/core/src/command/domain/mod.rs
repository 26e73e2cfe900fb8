pub mod channel;
pub mod command_debouncer;
pub mod dispatch_router;
pub mod translation_table;
pub mod transport;
