pub mod dates;
pub mod http_client_factory;

pub use dates::{day_bounds, parse_iso_date};
pub use http_client_factory::HttpClientFactory;
