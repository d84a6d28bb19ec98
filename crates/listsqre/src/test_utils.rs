use crate::api::ListsqreApi;
use crate::store::db::Database;
use crate::store::flat_file::FlatFileStore;
use crate::store::fs_backend::FsBackend;
use std::path::PathBuf;
use tempfile::TempDir;

/// An API over a fresh on-disk database and files directory.
pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub api: ListsqreApi<FsBackend>,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let db = Database::open(&root.join("listsqre.db")).expect("failed to open database");
        let files = FlatFileStore::with_backend(FsBackend::new(root.join("cards")));
        Self {
            _temp_dir: temp_dir,
            api: ListsqreApi::new(db, files),
            root,
        }
    }

    pub fn file_path(&self, stem: &str) -> PathBuf {
        self.root.join("cards").join(format!("{}.txt", stem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_file_lands_under_root() {
        let env = TestEnv::new();
        let card = env.api.create_card("Reading List", "").unwrap();
        let mut session = env.api.open_file(&card).unwrap();
        session.registry_mut().add_item("Dune", "Herbert", false);
        assert!(session.close().unwrap());

        let text = std::fs::read_to_string(env.file_path("reading-list-1")).unwrap();
        assert!(text.contains("Dune"));
        assert_eq!(env.api.file_path(&card).unwrap(), env.file_path("reading-list-1"));
    }

    #[test]
    fn database_survives_reopen() {
        let env = TestEnv::new();
        env.api.create_card("keep", "").unwrap();

        let db = Database::open(&env.root.join("listsqre.db")).unwrap();
        let api = ListsqreApi::new(db, FlatFileStore::with_backend(FsBackend::new(env.root.join("cards"))));
        assert_eq!(api.list_cards().unwrap().len(), 1);
    }
}
