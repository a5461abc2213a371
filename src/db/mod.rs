pub mod pool;
pub mod stocks;
