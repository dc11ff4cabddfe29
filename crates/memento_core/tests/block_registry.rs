use chrono::NaiveDate;
use memento_core::db::open_db_in_memory;
use memento_core::{
    BlockRegistry, BlockServiceError, LifeConfig, ObjectiveRepository, PeriodKey,
    PeriodReconciler, SqliteBlockRepository, SqliteObjectiveRepository, SqliteUserRepository,
    UserId, UserProfile, UserRepository, DEFAULT_BLOCK_COLOR,
};
use rusqlite::Connection;
use uuid::Uuid;

fn seed_owner(conn: &Connection) -> UserId {
    SqliteUserRepository::try_new(conn)
        .unwrap()
        .create_user(&UserProfile::new(
            NaiveDate::from_ymd_opt(1985, 6, 15).unwrap(),
            90,
        ))
        .unwrap()
}

fn registry(conn: &Connection) -> BlockRegistry<SqliteBlockRepository<'_>> {
    BlockRegistry::new(
        SqliteBlockRepository::try_new(conn).unwrap(),
        &LifeConfig::default(),
    )
}

#[test]
fn blocks_append_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_owner(&conn);
    let registry = registry(&conn);

    for name in ["Sleep", "Work", "Chores", "Health"] {
        registry.add_block(owner, name, Some("#AABBCC")).unwrap();
    }

    let blocks = registry.list().unwrap();
    let names: Vec<_> = blocks.iter().map(|block| block.name.as_str()).collect();
    assert_eq!(names, vec!["Sleep", "Work", "Chores", "Health"]);
    let orders: Vec<_> = blocks.iter().map(|block| block.sort_order).collect();
    assert_eq!(orders, vec![0, 1, 2, 3]);
    assert!(blocks.iter().all(|block| block.color == "#aabbcc"));
    assert!(blocks.iter().all(|block| block.owner_id == owner));
}

#[test]
fn block_added_after_a_delete_sorts_strictly_last() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_owner(&conn);
    let registry = registry(&conn);
    let first = registry.add_block(owner, "a", None).unwrap();
    for name in ["b", "c", "d"] {
        registry.add_block(owner, name, None).unwrap();
    }
    assert!(registry.delete(first.id).unwrap());

    let appended = registry.add_block(owner, "e", None).unwrap();

    let blocks = registry.list().unwrap();
    let orders: Vec<_> = blocks
        .iter()
        .map(|block| (block.name.as_str(), block.sort_order))
        .collect();
    assert_eq!(orders, vec![("b", 1), ("c", 2), ("d", 3), ("e", 4)]);
    assert!(blocks[..3]
        .iter()
        .all(|block| block.sort_order < appended.sort_order));
}

#[test]
fn missing_color_falls_back_to_default() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_owner(&conn);
    let registry = registry(&conn);

    let block = registry.add_block(owner, "Chores", None).unwrap();

    assert_eq!(block.color, DEFAULT_BLOCK_COLOR);
    assert_eq!(registry.list().unwrap()[0].color, "#6b7280");
}

#[test]
fn rename_trims_and_rejects_blank_names() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_owner(&conn);
    let registry = registry(&conn);
    let block = registry.add_block(owner, "Sleep", Some("#000000")).unwrap();

    let renamed = registry.rename(block.id, "  Rest  ").unwrap().unwrap();
    assert_eq!(renamed.name, "Rest");
    assert_eq!(renamed.sort_order, block.sort_order);

    assert!(matches!(
        registry.rename(block.id, "   "),
        Err(BlockServiceError::InvalidName)
    ));
    assert_eq!(registry.list().unwrap()[0].name, "Rest");
}

#[test]
fn recolor_validates_hex_colors() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_owner(&conn);
    let registry = registry(&conn);
    let block = registry.add_block(owner, "Work", Some("#000000")).unwrap();

    let recolored = registry.recolor(block.id, "#12AB9f").unwrap().unwrap();
    assert_eq!(recolored.color, "#12ab9f");

    for bad in ["red", "#123", "12ab9f", "#12ab9g"] {
        assert!(matches!(
            registry.recolor(block.id, bad),
            Err(BlockServiceError::InvalidColor(_))
        ));
    }
}

#[test]
fn missing_block_operations_are_noops() {
    let conn = open_db_in_memory().unwrap();
    let registry = registry(&conn);
    let missing = Uuid::new_v4();

    assert_eq!(registry.rename(missing, "Ghost").unwrap(), None);
    assert_eq!(registry.recolor(missing, "#ffffff").unwrap(), None);
    assert!(!registry.delete(missing).unwrap());
}

#[test]
fn add_block_for_unknown_owner_fails() {
    let conn = open_db_in_memory().unwrap();
    let registry = registry(&conn);

    let err = registry
        .add_block(Uuid::new_v4(), "Sleep", Some("#000000"))
        .unwrap_err();
    assert!(matches!(err, BlockServiceError::Repo(ref repo) if repo.is_store_failure()));
}

#[test]
fn deleting_a_block_cascades_to_its_period_objectives() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_owner(&conn);
    let registry = registry(&conn);
    let sleep = registry.add_block(owner, "Sleep", Some("#000000")).unwrap();
    registry.add_block(owner, "Work", Some("#ffffff")).unwrap();
    let period = PeriodKey::containing(NaiveDate::from_ymd_opt(2024, 9, 4).unwrap());
    PeriodReconciler::new(
        SqliteObjectiveRepository::try_new(&conn).unwrap(),
        &LifeConfig::default(),
    )
    .ensure_period(period)
    .unwrap();

    assert!(registry.delete(sleep.id).unwrap());

    let remaining = SqliteObjectiveRepository::try_new(&conn)
        .unwrap()
        .list_period(period)
        .unwrap();
    assert_eq!(remaining.len(), 2);
    assert_eq!(registry.list().unwrap().len(), 1);
}
