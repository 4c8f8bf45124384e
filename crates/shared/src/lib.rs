pub mod error;
pub mod form;
pub mod geo;
pub mod models;
pub mod page;
pub mod response;
pub mod results;
