use super::backend::TextBackend;
use crate::error::{Result, StoreError};
use crate::model::CardFileName;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

/// In-memory text backend for testing.
///
/// Uses `RefCell` for interior mutability since a flat-file session is
/// single-threaded. This keeps the `TextBackend` trait on `&self`.
#[derive(Default)]
pub struct MemBackend {
    files: RefCell<HashMap<CardFileName, String>>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Raw content, for assertions.
    pub fn contents(&self, name: &CardFileName) -> Option<String> {
        self.files.borrow().get(name).cloned()
    }

    fn check_writable(&self) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(StoreError::Io(io::Error::other("Simulated write error")));
        }
        Ok(())
    }
}

impl TextBackend for MemBackend {
    fn create(&self, name: &CardFileName) -> Result<()> {
        self.check_writable()?;
        self.files.borrow_mut().entry(name.clone()).or_default();
        Ok(())
    }

    fn delete(&self, name: &CardFileName) -> Result<()> {
        self.files.borrow_mut().remove(name);
        Ok(())
    }

    fn exists(&self, name: &CardFileName) -> bool {
        self.files.borrow().contains_key(name)
    }

    fn append(&self, name: &CardFileName, data: &str) -> Result<()> {
        self.check_writable()?;
        self.files
            .borrow_mut()
            .entry(name.clone())
            .or_default()
            .push_str(data);
        Ok(())
    }

    fn read(&self, name: &CardFileName) -> Result<Option<String>> {
        Ok(self.files.borrow().get(name).cloned())
    }

    fn replace(&self, name: &CardFileName, data: &str) -> Result<()> {
        self.check_writable()?;
        self.files
            .borrow_mut()
            .insert(name.clone(), data.to_string());
        Ok(())
    }

    fn path(&self, name: &CardFileName) -> PathBuf {
        PathBuf::from(format!("memory://{}.txt", name))
    }
}
