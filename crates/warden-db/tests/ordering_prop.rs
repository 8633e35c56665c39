use proptest::collection::hash_set;
use proptest::prelude::*;
use warden_core::{ListingStore, NewPrivilege, Privilege, PrivilegeStore, SortOrder};
use warden_db::repo::PrivilegeRepo;
use warden_db::{connect_sqlite_with_max, migrate};

async fn listed_ids(names: Vec<String>, field: &str) -> (Vec<i64>, Vec<i64>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_url = format!("sqlite://{}", dir.path().join("warden.sqlite").display());
    let pool = connect_sqlite_with_max(&db_url, 1).await.expect("sqlite");
    migrate(&pool).await.expect("migrate");
    let repo = PrivilegeRepo::new(pool);
    for name in names {
        repo.create(NewPrivilege { name }).await.expect("create");
    }
    let asc = repo
        .fetch(
            Some(SortOrder::parse::<Privilege>(field, "asc").expect("valid")),
            None,
        )
        .await
        .expect("asc");
    let desc = repo
        .fetch(
            Some(SortOrder::parse::<Privilege>(field, "desc").expect("valid")),
            None,
        )
        .await
        .expect("desc");
    (
        asc.iter().map(|p| p.id).collect(),
        desc.iter().map(|p| p.id).collect(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn descending_is_exact_reverse_of_ascending(
        names in hash_set("[a-zA-Z:]{1,8}", 0..12),
        field in prop::sample::select(vec!["id", "name", "created_at"]),
    ) {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let (asc, mut desc) = runtime.block_on(listed_ids(names.into_iter().collect(), field));
        desc.reverse();
        prop_assert_eq!(asc, desc);
    }
}
