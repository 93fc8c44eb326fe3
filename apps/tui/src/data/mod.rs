// Data module: fetching, normalization, and the in-memory application state.

pub mod fetch;
pub mod model;
pub mod store;

pub use fetch::{DataError, Fetcher};
pub use model::{CellValue, Record, Sheet};
pub use store::DataStore;
