use super::backend::TextBackend;
use crate::codec::DelimiterCodec;
use crate::error::Result;
use crate::model::CardFileName;
use crate::registry::FieldRegistry;
use std::path::PathBuf;
use tracing::debug;

/// One delimited text file per card, read into and dumped from a
/// [`FieldRegistry`].
///
/// Every save is a full rewrite of the working set; there is no incremental
/// diffing.
pub struct FlatFileStore<B: TextBackend> {
    /// The underlying text backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    codec: DelimiterCodec,
}

impl<B: TextBackend> FlatFileStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            codec: DelimiterCodec::default(),
        }
    }

    pub fn with_codec(mut self, codec: DelimiterCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn codec(&self) -> &DelimiterCodec {
        &self.codec
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn path(&self, name: &CardFileName) -> PathBuf {
        self.backend.path(name)
    }

    pub fn exists(&self, name: &CardFileName) -> bool {
        self.backend.exists(name)
    }

    pub fn create_text_file(&self, name: &CardFileName) -> Result<()> {
        self.backend.create(name)?;
        debug!(file = %name, "created card file");
        Ok(())
    }

    pub fn delete_text_file(&self, name: &CardFileName) -> Result<()> {
        self.backend.delete(name)?;
        debug!(file = %name, "deleted card file");
        Ok(())
    }

    /// Deletes the files of several cards, e.g. after a bulk card delete.
    pub fn delete_text_files<'a, I>(&self, names: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a CardFileName>,
    {
        let mut deleted = 0;
        for name in names {
            self.delete_text_file(name)?;
            deleted += 1;
        }
        Ok(deleted)
    }

    /// Appends raw, already encoded text.
    pub fn store_data_to_file(&self, name: &CardFileName, data: &str) -> Result<()> {
        self.backend.append(name, data)
    }

    /// Loads the file into `registry`, appending after whatever it already
    /// holds. A missing file loads nothing.
    pub fn read_from_file(&self, name: &CardFileName, registry: &mut FieldRegistry) -> Result<usize> {
        let Some(text) = self.backend.read(name)? else {
            debug!(file = %name, "no card file to read");
            return Ok(0);
        };
        let loaded = self.codec.decode_into(&text, registry);
        debug!(file = %name, loaded, "read card file");
        Ok(loaded)
    }

    /// Rewrites the file from `registry`. An empty registry truncates the file.
    ///
    /// Returns false, writing nothing, when the file does not exist: saving
    /// never resurrects a card whose file was deleted.
    pub fn update_text_file(&self, name: &CardFileName, registry: &FieldRegistry) -> Result<bool> {
        if !self.backend.exists(name) {
            debug!(file = %name, "skipping save, card file is gone");
            return Ok(false);
        }
        self.backend.replace(name, &self.encode_registry(registry))?;
        debug!(file = %name, records = registry.len(), "rewrote card file");
        Ok(true)
    }

    pub fn encode_registry(&self, registry: &FieldRegistry) -> String {
        registry.iter().map(|r| self.codec.encode(r)).collect()
    }
}
