mod lens_error;
mod schema_error;
mod storage_error;

pub use lens_error::{LensError, LensResult};
pub use schema_error::SchemaError;
pub use storage_error::StorageError;
