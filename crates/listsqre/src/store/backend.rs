use crate::error::Result;
use crate::model::CardFileName;
use std::path::PathBuf;

/// Abstract interface for the raw text I/O behind the flat-file store.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while FlatFileStore handles the "what" (codec, registry dumps).
pub trait TextBackend {
    /// Create an empty file if none exists. Existing content is left alone.
    fn create(&self, name: &CardFileName) -> Result<()>;

    /// Delete the file. Deleting a missing file is not an error.
    fn delete(&self, name: &CardFileName) -> Result<()>;

    fn exists(&self, name: &CardFileName) -> bool;

    /// Append raw text, creating the file if needed.
    fn append(&self, name: &CardFileName, data: &str) -> Result<()>;

    /// Read the whole file.
    /// Returns Ok(None) if the file does not exist.
    fn read(&self, name: &CardFileName) -> Result<Option<String>>;

    /// Replace the whole file with `data`.
    /// MUST be atomic (e.g. write to tmp then rename) so a failed rewrite never
    /// leaves a half-written card behind.
    fn replace(&self, name: &CardFileName, data: &str) -> Result<()>;

    /// Where the file lives. For MemBackend, a virtual path.
    fn path(&self, name: &CardFileName) -> PathBuf;
}
