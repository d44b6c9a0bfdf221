pub mod compute;
pub mod storage;
