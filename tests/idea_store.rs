use std::{collections::BTreeSet, fs};

use itrk::{BackupManager, Config, Idea, IdeaStore, IdeaUpdate};
use tempfile::TempDir;

fn setup() -> (TempDir, Config, IdeaStore) {
    let temp = TempDir::new().unwrap();
    let config = Config::with_home(temp.path());
    let store = IdeaStore::from_config(&config).unwrap();
    (temp, config, store)
}

#[test]
fn test_create_load_update_delete_lifecycle() {
    let (_temp, _config, store) = setup();

    let created = store.create("T", vec!["a".to_string()], "C").unwrap();
    assert_eq!(store.load(created.id).unwrap(), Some(created.clone()));

    // Back-date the file so the update lands on a later timestamp.
    let mut older = created.clone();
    older.id = 200101000000;
    older.modified = 200101000000;
    store.save(&older).unwrap();

    assert!(store
        .update(older.id, IdeaUpdate::default().title("New"))
        .unwrap());
    let updated = store.load(older.id).unwrap().unwrap();
    assert_eq!(updated.title, "New");
    assert!(updated.modified > older.modified);
    assert_eq!(updated.tags, older.tags);
    assert_eq!(updated.content, older.content);

    assert!(store.delete(older.id).unwrap());
    assert!(store.load(older.id).unwrap().is_none());
    assert!(!store.delete(older.id).unwrap());
}

#[test]
fn test_list_reflects_directory_contents() {
    let (_temp, _config, store) = setup();
    let ids: BTreeSet<u64> = (1..=5).map(|n| 240101000000 + n).collect();
    for id in &ids {
        store
            .save(&Idea::new(*id, format!("Idea {}", id), Vec::new(), "body"))
            .unwrap();
    }

    let listed: Vec<u64> = store.list_all().unwrap().into_iter().map(|i| i.id).collect();
    assert_eq!(listed, ids.into_iter().collect::<Vec<_>>());
}

#[test]
fn test_hand_written_file_is_listed() {
    let (_temp, _config, store) = setup();
    fs::write(
        store.dir().join("idea241025154736.md"),
        concat!(
            "---\n",
            "id: 241025154736\n",
            "title: \"My First Idea\"\n",
            "tags: [\"python\", \"markdown\", \"storage\"]\n",
            "modified: 241025154736\n",
            "---\n",
            "\n",
            "# My First Idea\n",
            "\n",
            "This is a description of the first idea.\n",
        ),
    )
    .unwrap();

    let ideas = store.list_all().unwrap();
    assert_eq!(ideas.len(), 1);
    assert_eq!(ideas[0].title, "My First Idea");
    assert_eq!(ideas[0].tags, vec!["python", "markdown", "storage"]);
    assert!(ideas[0].content.starts_with("# My First Idea"));
}

#[test]
fn test_malformed_file_excluded_from_listing() {
    let (_temp, _config, store) = setup();
    store
        .save(&Idea::new(240101000000, "Good", Vec::new(), ""))
        .unwrap();
    let bad = "---\ntitle: missing id\nmodified: 240101000001\n---\n";
    fs::write(store.path_for(240101000001), bad).unwrap();

    assert!(Idea::parse(bad).unwrap_err().is_format());
    let ideas = store.list_all().unwrap();
    assert_eq!(ideas.len(), 1);
    assert_eq!(ideas[0].id, 240101000000);
}

#[test]
fn test_backup_operates_on_store_directory() {
    let (_temp, config, store) = setup();
    let idea = store.create("Backed up", vec!["b".to_string()], "safe").unwrap();

    let backups = BackupManager::from_config(&config);
    let archive = backups.create_backup().unwrap();
    assert!(archive.starts_with(&config.backup_dir));

    store.delete(idea.id).unwrap();
    backups.restore_backup(&archive, false).unwrap();
    assert_eq!(store.load(idea.id).unwrap(), Some(idea));
}
