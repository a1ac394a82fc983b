//! Infrastructure layer - Storage, services and logging

pub mod access_key;
pub mod logging;
pub mod storage;
