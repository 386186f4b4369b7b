pub mod export;
pub mod fx;
