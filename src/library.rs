pub mod logger;
pub mod worker_pool;
