pub mod order_service;
pub mod product_service;
pub mod stats_service;

#[cfg(test)]
pub(crate) mod testing;
