mod common;

use anyhow::Result;
use common::TestApp;
use darulabror_api::types::Role;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn admin_role_cannot_manage_admins() -> Result<()> {
    let app = TestApp::spawn().await?;
    let token = app.token_for("staff@darulabror.sch.id", Role::Admin).await?;

    let res = app
        .client
        .get(app.url("/admin/admins"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "forbidden");

    let res = app
        .client
        .post(app.url("/admin/admins"))
        .bearer_auth(&token)
        .json(&json!({
            "username": "intruder",
            "email": "intruder@darulabror.sch.id",
            "password": "secret123",
            "role": "superadmin"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.backend.admins.len(), 1);

    // The admin tier itself stays open to plain admins
    let res = app
        .client
        .get(app.url("/admin/contacts"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn superadmin_manages_admin_accounts() -> Result<()> {
    let app = TestApp::spawn().await?;
    let token = app.token_for("head@darulabror.sch.id", Role::Superadmin).await?;

    let res = app
        .client
        .post(app.url("/admin/admins"))
        .bearer_auth(&token)
        .json(&json!({
            "username": "operator",
            "email": "operator@darulabror.sch.id",
            "password": "operator-pass",
            "role": "admin"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["role"], "admin");
    assert_eq!(body["data"]["is_active"], true);
    assert!(body["data"].get("password").is_none());
    let id = body["data"]["id"].as_i64().unwrap();

    // The new account can log in
    app.login("operator@darulabror.sch.id", "operator-pass").await?;

    let res = app
        .client
        .post(app.url("/admin/admins"))
        .bearer_auth(&token)
        .json(&json!({
            "username": "operator2",
            "email": "operator@darulabror.sch.id",
            "password": "operator-pass",
            "role": "admin"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app
        .client
        .get(app.url("/admin/admins?page=1&limit=10"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["meta"]["total"], 2);
    assert_eq!(body["data"]["items"][0]["email"], "operator@darulabror.sch.id");

    // Blank password keeps the old one
    let res = app
        .client
        .put(app.url(&format!("/admin/admins/{}", id)))
        .bearer_auth(&token)
        .json(&json!({
            "username": "operator",
            "email": "operator@darulabror.sch.id",
            "password": "",
            "role": "admin",
            "is_active": false
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["is_active"], false);

    let res = app
        .client
        .post(app.url("/auth/login"))
        .json(&json!({ "email": "operator@darulabror.sch.id", "password": "operator-pass" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .client
        .delete(app.url(&format!("/admin/admins/{}", id)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "admin deleted");
    assert!(body.get("data").is_none());

    let res = app
        .client
        .delete(app.url(&format!("/admin/admins/{}", id)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn admin_input_is_validated() -> Result<()> {
    let app = TestApp::spawn().await?;
    let token = app.token_for("head@darulabror.sch.id", Role::Superadmin).await?;

    let res = app
        .client
        .post(app.url("/admin/admins"))
        .bearer_auth(&token)
        .json(&json!({
            "username": "op",
            "email": "not-an-email",
            "password": "123",
            "role": "janitor"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await?;
    for field in ["username", "email", "password", "role"] {
        assert!(body["field_errors"].get(field).is_some(), "{}", field);
    }

    let res = app
        .client
        .delete(app.url("/admin/admins/abc"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "invalid id");
    Ok(())
}
