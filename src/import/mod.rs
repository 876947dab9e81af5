//! Uploading a CSV file of transactions to the backend.

mod import_endpoint;
mod import_page;

pub use import_endpoint::import_endpoint;
pub use import_page::get_import_page;
