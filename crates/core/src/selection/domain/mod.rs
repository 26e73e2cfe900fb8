pub mod auto_dwell_lock;
pub mod manual_select;
pub mod selection_policy;
pub mod selection_region;
