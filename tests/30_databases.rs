mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::GOOD_TOKEN;

#[tokio::test]
async fn list_renames_envelope_only() -> Result<()> {
    let ctx = common::setup().await?;

    let res = common::get(&ctx.app, "/environments/1/databases", Some(GOOD_TOKEN)).await?;
    assert_eq!(res.status, StatusCode::OK);

    let body = res.json()?;
    assert_eq!(body["totalSize"], 122880);
    assert_eq!(body["databases"][1], json!({ "Name": "shop", "SizeOnDisk": 81920, "Empty": false, "myPermission": "readOnly" }));

    // The listing does not load navigation
    let paths: Vec<String> = ctx.backend.calls().into_iter().map(|c| c.path).collect();
    assert_eq!(paths, vec!["/environments/1/databases"]);
    Ok(())
}

#[tokio::test]
async fn list_failure_falls_back_to_environments() -> Result<()> {
    let ctx = common::setup().await?;

    let res = common::get(&ctx.app, "/environments/broken/databases", Some(GOOD_TOKEN)).await?;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/environments"));
    Ok(())
}

#[tokio::test]
async fn show_loads_stats_and_collections() -> Result<()> {
    let ctx = common::setup().await?;

    let res = common::get(&ctx.app, "/environments/1/databases/shop", Some(GOOD_TOKEN)).await?;
    assert_eq!(res.status, StatusCode::OK);

    let body = res.json()?;
    assert_eq!(body["database"], "shop");
    assert_eq!(body["stats"]["dataSize"], 1024);
    assert_eq!(body["collections"], json!(["orders", "customers"]));
    assert_eq!(body["myPermission"], "readWrite");
    assert_eq!(body["currentEnvironmentId"], "1");
    assert_eq!(body["currentDatabase"], "shop");
    assert_eq!(body["user"]["id"], 7);
    Ok(())
}

#[tokio::test]
async fn show_missing_database_falls_back_to_listing() -> Result<()> {
    let ctx = common::setup().await?;

    let res = common::get(&ctx.app, "/environments/1/databases/ghost", Some(GOOD_TOKEN)).await?;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/environments/1/databases"));
    Ok(())
}

#[tokio::test]
async fn create_sends_backend_field_names() -> Result<()> {
    let ctx = common::setup().await?;

    let res = common::post_form(
        &ctx.app,
        "/environments/1/databases?/createDb",
        Some(GOOD_TOKEN),
        "dbName=inventory&initialCollection=items",
    )
    .await?;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/environments/1/databases"));

    let writes = ctx.backend.writes();
    assert_eq!(writes[0].method, Method::POST);
    assert_eq!(writes[0].path, "/environments/1/databases");
    let sent: Value = serde_json::from_str(&writes[0].body)?;
    assert_eq!(sent, json!({ "dbName": "inventory", "initialCollection": "items" }));
    Ok(())
}

#[tokio::test]
async fn rename_targets_old_name() -> Result<()> {
    let ctx = common::setup().await?;

    let res = common::post_form(
        &ctx.app,
        "/environments/1/databases?/updateDb",
        Some(GOOD_TOKEN),
        "oldDbName=my+shop&newDbName=store",
    )
    .await?;
    assert_eq!(res.status, StatusCode::SEE_OTHER);

    let writes = ctx.backend.writes();
    assert_eq!(writes[0].method, Method::PUT);
    assert_eq!(writes[0].path, "/environments/1/databases/my%20shop");
    let sent: Value = serde_json::from_str(&writes[0].body)?;
    assert_eq!(sent, json!({ "newDbName": "store" }));
    Ok(())
}

#[tokio::test]
async fn delete_validates_and_reports() -> Result<()> {
    let ctx = common::setup().await?;

    let res = common::post_form(&ctx.app, "/environments/1/databases?/deleteDb", Some(GOOD_TOKEN), "").await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()?["error"], "Invalid database name");
    assert!(ctx.backend.calls().is_empty());

    let res = common::post_form(&ctx.app, "/environments/1/databases?/deleteDb", Some(GOOD_TOKEN), "dbName=broken").await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()?["error"], "Failed to delete database");

    let res = common::post_form(&ctx.app, "/environments/1/databases?/deleteDb", Some(GOOD_TOKEN), "dbName=shop").await?;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    let writes = ctx.backend.writes();
    assert_eq!(writes.last().map(|c| (c.method.clone(), c.path.clone())), Some((Method::DELETE, "/environments/1/databases/shop".to_string())));
    Ok(())
}
