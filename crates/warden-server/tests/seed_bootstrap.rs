use warden_core::{
    ListingStore, NewPrivilege, PrivilegeStore, RoleSeed, RoleStore, SeedConfig, UserSeed,
    UserStore,
};
use warden_server::domains::auth::{authenticate, AuthError};
use warden_server::domains::setup::{SeedError, SeedOutcome, SeedState, Seeder};

mod support;

#[tokio::test]
async fn seed_creates_default_access_control_records() {
    let app = support::TestApp::new().await;
    let seeder = support::seeder_for(&app.state);

    assert_eq!(seeder.on_ready().await.expect("seed"), SeedOutcome::Seeded);

    let privileges: Vec<String> = app
        .state
        .privileges
        .fetch(None, None)
        .await
        .expect("privileges")
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(privileges, vec!["user:write", "role:write"]);

    let role = app
        .state
        .roles
        .find_by_name("admin")
        .await
        .expect("find role")
        .expect("admin role");
    let mut names = role.privilege_names();
    names.sort_unstable();
    assert_eq!(names, vec!["role:write", "user:write"]);

    let admin = app
        .state
        .users
        .find_by_name("admin")
        .await
        .expect("find user")
        .expect("admin user");
    assert_eq!(admin.role_names(), vec!["admin"]);
}

#[tokio::test]
async fn seeded_admin_authenticates() {
    let app = support::TestApp::seeded().await;

    let principal = authenticate(&app.state.users, app.state.config.auth.kdf, "admin", "adminpass")
        .await
        .expect("authenticate");
    assert_eq!(principal.name, "admin");
    assert_eq!(principal.roles, vec!["admin".to_string()]);

    let err = authenticate(&app.state.users, app.state.config.auth.kdf, "admin", "wrong")
        .await
        .expect_err("wrong password");
    assert!(matches!(err, AuthError::InvalidCredentials));
    let err = authenticate(&app.state.users, app.state.config.auth.kdf, "nobody", "adminpass")
        .await
        .expect_err("unknown user");
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn second_ready_signal_keeps_existing_records() {
    let app = support::TestApp::new().await;
    let seeder = support::seeder_for(&app.state);
    seeder.on_ready().await.expect("seed");

    let before = app
        .state
        .privileges
        .find_by_name("user:write")
        .await
        .expect("find")
        .expect("present");
    app.state
        .privileges
        .create(NewPrivilege {
            name: "audit:read".to_string(),
        })
        .await
        .expect("extra privilege");

    assert_eq!(
        seeder.on_ready().await.expect("second"),
        SeedOutcome::AlreadyDone
    );
    let after = app
        .state
        .privileges
        .find_by_name("user:write")
        .await
        .expect("find")
        .expect("present");
    assert_eq!(before.id, after.id);
    assert!(app
        .state
        .privileges
        .find_by_name("audit:read")
        .await
        .expect("find")
        .is_some());
}

#[tokio::test]
async fn new_seeder_resets_previous_data() {
    let app = support::TestApp::seeded().await;
    app.state
        .privileges
        .create(NewPrivilege {
            name: "stale:privilege".to_string(),
        })
        .await
        .expect("stale privilege");

    // A restarted process seeds again from scratch.
    let restarted = support::seeder_for(&app.state);
    assert_eq!(restarted.on_ready().await.expect("seed"), SeedOutcome::Seeded);
    assert!(app
        .state
        .privileges
        .find_by_name("stale:privilege")
        .await
        .expect("find")
        .is_none());
    let users = app.state.users.fetch(None, None).await.expect("users");
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn configured_seed_set_is_applied() {
    let app = support::TestApp::new().await;
    let mut config = SeedConfig::default();
    config.privileges.push(warden_core::PrivilegeSeed {
        name: "audit:read".to_string(),
    });
    config.roles.push(RoleSeed {
        name: "auditor".to_string(),
        privileges: vec!["audit:read".to_string()],
    });
    config.users.push(UserSeed {
        login: "carol".to_string(),
        password: "carol-secret".to_string(),
        roles: vec!["auditor".to_string(), "admin".to_string()],
    });
    let seeder = Seeder::new(
        std::sync::Arc::new(app.state.privileges.clone()),
        std::sync::Arc::new(app.state.roles.clone()),
        std::sync::Arc::new(app.state.users.clone()),
        config,
    );
    seeder.on_ready().await.expect("seed");

    let carol = app
        .state
        .users
        .find_by_name("carol")
        .await
        .expect("find")
        .expect("carol");
    let mut roles = carol.role_names();
    roles.sort_unstable();
    assert_eq!(roles, vec!["admin", "auditor"]);
    authenticate(&app.state.users, app.state.config.auth.kdf, "carol", "carol-secret")
        .await
        .expect("carol authenticates");
}

#[tokio::test]
async fn dangling_role_reference_fails_seed() {
    let app = support::TestApp::new().await;
    let mut config = SeedConfig::default();
    config.users[0].roles = vec!["operator".to_string()];
    let seeder = Seeder::new(
        std::sync::Arc::new(app.state.privileges.clone()),
        std::sync::Arc::new(app.state.roles.clone()),
        std::sync::Arc::new(app.state.users.clone()),
        config,
    );

    let err = seeder.on_ready().await.expect_err("must fail");
    assert!(matches!(err, SeedError::MissingRole(ref role) if role == "operator"));
    assert_eq!(seeder.state().await, SeedState::NotStarted);
    assert!(app
        .state
        .users
        .find_by_name("admin")
        .await
        .expect("find")
        .is_none());
}

#[tokio::test]
async fn unknown_login_costs_as_much_as_a_wrong_password() {
    let mut config = support::test_config();
    config.auth.kdf.iterations = 2;
    config.auth.kdf.memory_kb = 4096;
    let app = support::TestApp::with_config(config).await;
    support::seeder_for(&app.state)
        .on_ready()
        .await
        .expect("seed");
    let kdf = app.state.config.auth.kdf;

    let started = std::time::Instant::now();
    let err = authenticate(&app.state.users, kdf, "admin", "wrong")
        .await
        .expect_err("wrong password");
    let known = started.elapsed();
    assert!(matches!(err, AuthError::InvalidCredentials));

    let started = std::time::Instant::now();
    let err = authenticate(&app.state.users, kdf, "nobody", "wrong")
        .await
        .expect_err("unknown user");
    let unknown = started.elapsed();
    assert!(matches!(err, AuthError::InvalidCredentials));

    assert!(
        unknown * 4 >= known,
        "unknown login took {unknown:?}, known login {known:?}"
    );
}
