//! Output seam for completed records.

use core::convert::Infallible;

/// Anything completed records can be appended to.
pub trait RecordSink<T> {
    type Error;

    fn append(&mut self, record: T) -> Result<(), Self::Error>;
}

impl<T> RecordSink<T> for Vec<T> {
    type Error = Infallible;

    fn append(&mut self, record: T) -> Result<(), Infallible> {
        self.push(record);
        Ok(())
    }
}
