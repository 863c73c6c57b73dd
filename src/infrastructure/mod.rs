pub mod cache;
pub mod db;
pub mod media;
pub mod storage;
