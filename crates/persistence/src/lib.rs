pub mod error;
pub mod header;
pub mod stream;
pub mod scan;
pub mod fixtures;

pub use error::{PersistenceError, Result};
pub use header::{StreamHeader, StreamKind};
pub use stream::{read_all, read_stream, write_all, StreamReader, StreamRecord, StreamWriter};
