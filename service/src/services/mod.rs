// darkroom_service/src/services/mod.rs

pub mod fs_blob_store;
pub mod mail_log;

pub use fs_blob_store::FsBlobStore;
pub use mail_log::{LoggingMailer, LoggingStaffNotifier};
