use crate::error::Result;
use crate::model::CardFileName;
use crate::registry::FieldRegistry;
use crate::store::backend::TextBackend;
use crate::store::flat_file::FlatFileStore;
use tracing::debug;

/// One open card on the flat-file path.
///
/// Opening a session creates the card's file if needed and loads it into a
/// registry that belongs to this session alone. Edits go through
/// [`registry_mut`](Self::registry_mut) and reach the file on
/// [`save`](Self::save) or [`close`](Self::close).
pub struct FlatFileSession<'s, B: TextBackend> {
    store: &'s FlatFileStore<B>,
    name: CardFileName,
    registry: FieldRegistry,
}

impl<'s, B: TextBackend> FlatFileSession<'s, B> {
    pub fn open(store: &'s FlatFileStore<B>, name: CardFileName) -> Result<Self> {
        store.create_text_file(&name)?;
        let mut registry = FieldRegistry::new();
        let loaded = store.read_from_file(&name, &mut registry)?;
        debug!(file = %name, loaded, "opened flat-file session");
        Ok(Self {
            store,
            name,
            registry,
        })
    }

    pub fn name(&self) -> &CardFileName {
        &self.name
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FieldRegistry {
        &mut self.registry
    }

    /// Rewrites the file from the registry. Returns false if the file was
    /// deleted while the session was open.
    pub fn save(&self) -> Result<bool> {
        self.store.update_text_file(&self.name, &self.registry)
    }

    /// Saves, then releases the registry.
    pub fn close(self) -> Result<bool> {
        let saved = self.save()?;
        debug!(file = %self.name, saved, "closed flat-file session");
        Ok(saved)
    }
}
