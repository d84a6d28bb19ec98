use super::backend::TextBackend;
use crate::error::Result;
use crate::model::CardFileName;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process;

/// Flat files on disk: one `<stem>.txt` per card under a single directory.
pub struct FsBackend {
    root: PathBuf,
    file_ext: String,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            file_ext: ".txt".to_string(),
        }
    }

    pub fn with_file_ext(mut self, ext: &str) -> Self {
        if ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_path(&self, name: &CardFileName) -> PathBuf {
        self.root.join(format!("{}{}", name, self.file_ext))
    }

    fn ensure_root(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        Ok(())
    }
}

impl TextBackend for FsBackend {
    fn create(&self, name: &CardFileName) -> Result<()> {
        self.ensure_root()?;
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.file_path(name))
        {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, name: &CardFileName) -> Result<()> {
        match fs::remove_file(self.file_path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, name: &CardFileName) -> bool {
        self.file_path(name).is_file()
    }

    fn append(&self, name: &CardFileName, data: &str) -> Result<()> {
        self.ensure_root()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.file_path(name))?;
        // The handle is closed when `writer` drops, on every path out of here.
        let mut writer = BufWriter::new(file);
        writer.write_all(data.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    fn read(&self, name: &CardFileName) -> Result<Option<String>> {
        match fs::read_to_string(self.file_path(name)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn replace(&self, name: &CardFileName, data: &str) -> Result<()> {
        self.ensure_root()?;
        let target = self.file_path(name);

        // Atomic Write
        let tmp = self.root.join(format!(".{}-{}.tmp", name, process::id()));
        fs::write(&tmp, data)?;
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn path(&self, name: &CardFileName) -> PathBuf {
        self.file_path(name)
    }
}
