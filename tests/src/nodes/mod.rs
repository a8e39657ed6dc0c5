pub mod disperser;
pub mod proxy;
