use listsqre::codec::DelimiterCodec;
use listsqre::model::CardFileName;
use listsqre::registry::FieldRegistry;
use listsqre::session::FlatFileSession;
use listsqre::store::flat_file::FlatFileStore;
use listsqre::store::fs_backend::FsBackend;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FlatFileStore<FsBackend>) {
    let dir = TempDir::new().unwrap();
    let store = FlatFileStore::with_backend(FsBackend::new(dir.path().to_path_buf()));
    (dir, store)
}

fn name(title: &str) -> CardFileName {
    CardFileName::from_title(title).unwrap()
}

#[test]
fn test_round_trip_on_disk() {
    let (_dir, store) = setup();
    let file = name("Groceries");
    store.create_text_file(&file).unwrap();

    let mut registry = FieldRegistry::new();
    registry.add_item("A", "B", true);
    assert!(store.update_text_file(&file, &registry).unwrap());

    let mut fresh = FieldRegistry::new();
    assert_eq!(store.read_from_file(&file, &mut fresh).unwrap(), 1);
    let record = fresh.get(0).unwrap();
    assert_eq!(record.title, "A");
    assert_eq!(record.description, "B");
    assert!(record.is_pinned);
}

#[test]
fn test_file_is_line_per_record() {
    let (dir, store) = setup();
    let file = name("Groceries");
    store.create_text_file(&file).unwrap();

    let mut registry = FieldRegistry::new();
    registry.add_item("Milk", "", false);
    registry.add_item("Eggs", "", false);
    registry.add_item("Bread", "", false);
    store.update_text_file(&file, &registry).unwrap();

    let text = fs::read_to_string(dir.path().join("groceries.txt")).unwrap();
    assert_eq!(text.lines().count(), 3);
}

#[test]
fn test_hand_edited_file_is_read() {
    let (dir, store) = setup();
    let store = store.with_codec(DelimiterCodec::new("|", "#\n").unwrap());
    fs::write(
        dir.path().join("todo.txt"),
        "0|write docs|||1|#\n\n  # \n1|ship||\n#junk#\n",
    )
    .unwrap();

    let mut registry = FieldRegistry::new();
    assert_eq!(store.read_from_file(&name("Todo"), &mut registry).unwrap(), 2);
    assert!(registry.get(0).unwrap().is_pinned);
    assert_eq!(registry.get(1).unwrap().title, "ship");
    assert!(!registry.get(1).unwrap().is_pinned);
}

#[test]
fn test_sessions_do_not_share_state() {
    let (_dir, store) = setup();
    let mut groceries = FlatFileSession::open(&store, name("Groceries")).unwrap();
    let mut chores = FlatFileSession::open(&store, name("Chores")).unwrap();

    groceries.registry_mut().add_item("Milk", "", false);
    chores.registry_mut().add_item("Dishes", "", false);
    chores.registry_mut().push_to_selected(0);

    assert_eq!(groceries.registry().len(), 1);
    assert!(groceries.registry().selected().is_empty());
    groceries.close().unwrap();
    chores.close().unwrap();

    let reopened = FlatFileSession::open(&store, name("Groceries")).unwrap();
    let titles: Vec<_> = reopened.registry().iter().map(|r| r.title.clone()).collect();
    assert_eq!(titles, vec!["Milk"]);
}

#[test]
fn test_delete_selected_then_save() {
    let (_dir, store) = setup();
    let mut session = FlatFileSession::open(&store, name("List")).unwrap();
    for title in ["a", "b", "c", "d"] {
        session.registry_mut().add_item(title, "", false);
    }
    session.registry_mut().push_to_selected(1);
    session.registry_mut().push_to_selected(3);
    assert_eq!(session.registry_mut().delete_selected_nodes(), 2);
    session.close().unwrap();

    let reopened = FlatFileSession::open(&store, name("List")).unwrap();
    let titles: Vec<_> = reopened.registry().iter().map(|r| r.title.clone()).collect();
    assert_eq!(titles, vec!["a", "c"]);
    let ids: Vec<_> = reopened.registry().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![0, 1]);
}
