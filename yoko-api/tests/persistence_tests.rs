//! On-disk database survives a service restart

mod common;

use axum::http::StatusCode;
use common::{applicant, get, submit};
use yoko_api::mailer::Mailer;
use yoko_api::AppState;
use yoko_common::config::RootFolderInitializer;

#[tokio::test]
async fn test_submissions_persist_across_restart() {
    let root = tempfile::tempdir().unwrap();
    let initializer = RootFolderInitializer::new(root.path().to_path_buf());
    let db_path = initializer.database_path();
    assert!(!initializer.database_exists());

    let pool = yoko_common::db::init_database(&db_path).await.unwrap();
    let app = yoko_api::build_router(AppState::new(pool.clone(), Mailer::disabled()));
    let id = submit(&app, applicant("Nour", &["Finance"])).await;
    pool.close().await;
    assert!(initializer.database_exists());

    let pool = yoko_common::db::init_database(&db_path).await.unwrap();
    let app = yoko_api::build_router(AppState::new(pool, Mailer::disabled()));
    let (status, detail) = get(&app, &format!("/api/submissions/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["full_name"], "Nour");
}
