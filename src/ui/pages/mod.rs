pub mod import;
pub mod market;

pub use import::ImportPage;
pub use market::MarketPage;
