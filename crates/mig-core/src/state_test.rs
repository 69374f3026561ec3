use super::*;
use tempfile::tempdir;

fn ids(set: &DeployedSet) -> Vec<&str> {
    set.iter().map(|m| m.as_str()).collect()
}

#[test]
fn test_load_absent_file_is_empty_without_warning() {
    let dir = tempdir().unwrap();
    let store = StateStore::new(dir.path().join(".deployed_migrations"));

    let loaded = store.load();
    assert!(loaded.value.is_empty());
    assert!(loaded.warning.is_none());
}

#[test]
fn test_save_and_load() {
    let dir = tempdir().unwrap();
    let store = StateStore::new(dir.path().join(".deployed_migrations"));

    let mut set = DeployedSet::new();
    set.push(MigrationId::new("001_init"));
    set.push(MigrationId::new("002_add_users"));
    store.save(&set).unwrap();

    let loaded = store.load();
    assert!(loaded.warning.is_none());
    assert_eq!(ids(&loaded.value), vec!["001_init", "002_add_users"]);
}

#[test]
fn test_saved_format_is_pretty_json_array() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".deployed_migrations");
    let store = StateStore::new(&path);

    let set: DeployedSet = vec![MigrationId::new("001_init")].into_iter().collect();
    store.save(&set).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "[\n  \"001_init\"\n]");
    assert!(!dir.path().join(".deployed_migrations.tmp").exists());
}

#[test]
fn test_save_creates_parent_directory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state").join("deployed.json");
    let store = StateStore::new(&path);

    store.save(&DeployedSet::new()).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
}

#[test]
fn test_load_invalid_content_is_corrupt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".deployed_migrations");
    fs::write(&path, "{\"not\": \"a list\"}").unwrap();

    let loaded = StateStore::new(&path).load();

    assert!(loaded.value.is_empty());
    let warning = loaded.warning.unwrap();
    assert!(matches!(warning, CoreError::StateCorrupt { .. }));
    assert!(warning.to_string().contains("[M011]"));
}

#[test]
fn test_load_garbage_is_corrupt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".deployed_migrations");
    fs::write(&path, "001_init\n002_add_users\n").unwrap();

    let loaded = StateStore::new(&path).load();
    assert!(loaded.value.is_empty());
    assert!(matches!(
        loaded.warning,
        Some(CoreError::StateCorrupt { .. })
    ));
}

#[test]
fn test_load_empty_id_is_corrupt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".deployed_migrations");
    fs::write(&path, r#"["001_init", ""]"#).unwrap();

    let loaded = StateStore::new(&path).load();
    assert!(loaded.value.is_empty());
    let warning = loaded.warning.unwrap();
    assert!(matches!(warning, CoreError::StateCorrupt { .. }));
    assert!(warning.to_string().contains("must not be empty"));
}

#[test]
fn test_load_keeps_duplicates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".deployed_migrations");
    fs::write(&path, r#"["001_init", "001_init", "unknown_migration"]"#).unwrap();

    let loaded = StateStore::new(&path).load();
    assert!(loaded.warning.is_none());
    assert_eq!(
        ids(&loaded.value),
        vec!["001_init", "001_init", "unknown_migration"]
    );
}

#[test]
fn test_save_into_directory_path_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("occupied");
    fs::create_dir(&path).unwrap();
    fs::write(path.join("child"), "x").unwrap();

    let err = StateStore::new(&path).save(&DeployedSet::new()).unwrap_err();
    assert!(matches!(err, CoreError::StatePersistFailure { .. }));
}

#[test]
fn test_contains() {
    let set: DeployedSet = vec![MigrationId::new("001_init")].into_iter().collect();
    assert!(set.contains("001_init"));
    assert!(!set.contains("002_add_users"));
    assert_eq!(set.len(), 1);
}
