pub mod error;
pub mod request;
pub mod response;
pub mod statistics;
pub mod time_series;
