pub mod channel;
pub mod dss_path;
pub mod error;
pub mod observation;
pub mod run_id;
pub mod scenario;
pub mod tables;
