//! Tests for transaction support

use super::*;

fn installed_component(root: &Path) -> PathBuf {
    let dir = root.join("modules/nf-core/fastqc");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("main.nf"), "old").unwrap();
    dir
}

#[test]
fn test_stash_moves_directory_aside() {
    let temp = crate::test_fixtures::create_temp_dir();
    let dir = installed_component(temp.path());

    let mut transaction = Transaction::new();
    transaction.stash_dir(&dir).unwrap();

    assert!(!dir.exists());
    transaction.commit();
    assert!(!dir.exists());
}

#[test]
fn test_commit_discards_backup() {
    let temp = crate::test_fixtures::create_temp_dir();
    let dir = installed_component(temp.path());
    let parent = dir.parent().unwrap().to_path_buf();

    let mut transaction = Transaction::new();
    transaction.stash_dir(&dir).unwrap();
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("main.nf"), "new").unwrap();
    transaction.track_dir_created(&dir);
    transaction.commit();

    assert_eq!(fs::read_to_string(dir.join("main.nf")).unwrap(), "new");
    let leftovers: Vec<_> = fs::read_dir(&parent)
        .unwrap()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with(BACKUP_PREFIX))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_drop_restores_stashed_directory() {
    let temp = crate::test_fixtures::create_temp_dir();
    let dir = installed_component(temp.path());

    {
        let mut transaction = Transaction::new();
        transaction.stash_dir(&dir).unwrap();

        // Partially written replacement
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("main.nf"), "half").unwrap();
        transaction.track_dir_created(&dir);

        // Don't commit - should rollback on drop
    }

    assert_eq!(fs::read_to_string(dir.join("main.nf")).unwrap(), "old");
}

#[test]
fn test_rollback_removes_created_dirs() {
    let temp = crate::test_fixtures::create_temp_dir();
    let created = temp.path().join("subworkflows/nf-core/new");

    {
        let mut transaction = Transaction::new();
        fs::create_dir_all(&created).unwrap();
        transaction.track_dir_created(&created);
    }

    assert!(!created.exists());
}

#[test]
fn test_stash_missing_directory_is_removal_error() {
    let temp = crate::test_fixtures::create_temp_dir();
    let mut transaction = Transaction::new();
    let result = transaction.stash_dir(&temp.path().join("missing"));
    assert!(matches!(
        result,
        Err(crate::error::GraftError::RemovalError { .. })
    ));
}
