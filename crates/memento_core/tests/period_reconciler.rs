use chrono::NaiveDate;
use memento_core::db::open_db_in_memory;
use memento_core::{
    BlockRepository, LifeConfig, ObjectiveCategory, ObjectivePatch, ObjectiveQuotaLedger,
    ObjectiveRepository, ObjectiveScope, PeriodKey, PeriodReconciler, PeriodState,
    SqliteBlockRepository, SqliteObjectiveRepository, SqliteUserRepository, UserProfile,
    UserRepository,
};
use rusqlite::Connection;

fn week(y: i32, m: u32, d: u32) -> PeriodKey {
    PeriodKey::containing(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn seed_blocks(conn: &Connection, names: &[&str]) {
    let owner = SqliteUserRepository::try_new(conn)
        .unwrap()
        .create_user(&UserProfile::new(
            NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            80,
        ))
        .unwrap();
    let blocks = SqliteBlockRepository::try_new(conn).unwrap();
    for name in names {
        blocks.create_block(owner, name, "#445566").unwrap();
    }
}

fn reconciler(conn: &Connection) -> PeriodReconciler<SqliteObjectiveRepository<'_>> {
    PeriodReconciler::new(
        SqliteObjectiveRepository::try_new(conn).unwrap(),
        &LifeConfig::default(),
    )
}

#[test]
fn four_blocks_yield_eight_blank_objectives() {
    let conn = open_db_in_memory().unwrap();
    seed_blocks(&conn, &["Sleep", "Work", "Chores", "Health"]);

    let snapshot = reconciler(&conn).ensure_period(week(2024, 5, 8)).unwrap();

    assert_eq!(snapshot.state, PeriodState::Populated);
    assert_eq!(snapshot.blocks.len(), 4);
    assert_eq!(snapshot.objectives.len(), 8);
    assert!(snapshot
        .objectives
        .iter()
        .all(|objective| objective.is_blank() && !objective.is_completed));
    for block in &snapshot.blocks {
        let orders: Vec<_> = snapshot
            .objectives_for(block)
            .iter()
            .map(|objective| objective.sort_order)
            .collect();
        assert_eq!(orders, vec![0, 1]);
    }
}

#[test]
fn ensure_period_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    seed_blocks(&conn, &["Sleep", "Work"]);
    let reconciler = reconciler(&conn);
    let period = week(2024, 5, 8);

    let first = reconciler.ensure_period(period).unwrap();
    let second = reconciler.ensure_period(period).unwrap();

    assert_eq!(first.objectives, second.objectives);
    assert_eq!(second.objectives.len(), 4);
}

#[test]
fn user_edits_survive_repeated_reconciliation() {
    let conn = open_db_in_memory().unwrap();
    seed_blocks(&conn, &["Sleep"]);
    let reconciler = reconciler(&conn);
    let period = week(2024, 5, 8);
    let snapshot = reconciler.ensure_period(period).unwrap();

    let repo = SqliteObjectiveRepository::try_new(&conn).unwrap();
    let target = snapshot.objectives[0].id;
    repo.update_objective(
        target,
        &ObjectivePatch {
            text: Some("8 hours".to_string()),
            is_completed: Some(true),
        },
    )
    .unwrap();
    repo.delete_objective(snapshot.objectives[1].id).unwrap();

    let again = reconciler.ensure_period(period).unwrap();
    assert_eq!(again.objectives.len(), 1);
    assert_eq!(again.objectives[0].text, "8 hours");
    assert!(again.objectives[0].is_completed);
}

#[test]
fn moving_to_a_new_week_sweeps_every_other_week() {
    let conn = open_db_in_memory().unwrap();
    seed_blocks(&conn, &["Sleep", "Work"]);
    let reconciler = reconciler(&conn);
    let old = week(2024, 5, 8);
    let new = old.next();
    reconciler.ensure_period(old).unwrap();

    let snapshot = reconciler.ensure_period(new).unwrap();

    assert_eq!(snapshot.period, new);
    assert_eq!(snapshot.objectives.len(), 4);
    let repo = SqliteObjectiveRepository::try_new(&conn).unwrap();
    assert!(repo.list_period(old).unwrap().is_empty());
    assert!(snapshot.objectives.iter().all(|objective| matches!(
        objective.scope,
        ObjectiveScope::BlockPeriod { period, .. } if period == new
    )));
}

#[test]
fn sweep_leaves_category_objectives_alone() {
    let conn = open_db_in_memory().unwrap();
    seed_blocks(&conn, &["Sleep"]);
    let ledger = ObjectiveQuotaLedger::new(
        SqliteObjectiveRepository::try_new(&conn).unwrap(),
        &LifeConfig::default(),
    );
    let scope = ObjectiveScope::Category(ObjectiveCategory::LongTermPurpose);
    ledger.add(&scope, "write a book").unwrap();

    let reconciler = reconciler(&conn);
    reconciler.ensure_period(week(2024, 1, 3)).unwrap();
    reconciler.ensure_period(week(2024, 2, 7)).unwrap();

    assert_eq!(ledger.list(&scope).unwrap().len(), 1);
}

#[test]
fn no_blocks_leaves_week_unpopulated() {
    let conn = open_db_in_memory().unwrap();

    let snapshot = reconciler(&conn).ensure_period(week(2024, 5, 8)).unwrap();

    assert_eq!(snapshot.state, PeriodState::Unpopulated);
    assert!(snapshot.blocks.is_empty());
    assert!(snapshot.objectives.is_empty());
}

#[test]
fn placeholder_count_follows_config() {
    let conn = open_db_in_memory().unwrap();
    seed_blocks(&conn, &["Sleep", "Work", "Chores"]);
    let config = LifeConfig::from_toml_str("placeholders_per_block = 1\n").unwrap();
    let reconciler =
        PeriodReconciler::new(SqliteObjectiveRepository::try_new(&conn).unwrap(), &config);

    let snapshot = reconciler.ensure_period(week(2024, 5, 8)).unwrap();
    assert_eq!(snapshot.objectives.len(), 3);
}

#[test]
fn period_objectives_follow_block_order() {
    let conn = open_db_in_memory().unwrap();
    seed_blocks(&conn, &["First", "Second"]);

    let snapshot = reconciler(&conn).ensure_period(week(2024, 5, 8)).unwrap();

    let block_ids: Vec<_> = snapshot
        .objectives
        .iter()
        .map(|objective| match objective.scope {
            ObjectiveScope::BlockPeriod { block_id, .. } => block_id,
            ObjectiveScope::Category(_) => panic!("unexpected category objective"),
        })
        .collect();
    let first = snapshot.blocks[0].id;
    let second = snapshot.blocks[1].id;
    assert_eq!(block_ids, vec![first, first, second, second]);
}
