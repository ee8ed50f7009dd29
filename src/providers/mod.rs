pub mod exchangerate_api;
pub mod exchangerate_host;
pub mod resolver;
pub mod util;

pub use resolver::RateResolver;
