mod common;

use anyhow::Result;
use common::{registration_body, TestApp};
use darulabror_api::types::Role;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn registration_is_accepted_once_per_email_and_nisn() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .client
        .post(app.url("/registrations"))
        .json(&registration_body("rizki@mail.id", "0012345678"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["date_of_birth"], "2011-05-12");

    let res = app
        .client
        .post(app.url("/registrations"))
        .json(&registration_body("rizki@mail.id", "0099999999"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "registration email already used");

    let res = app
        .client
        .post(app.url("/registrations"))
        .json(&registration_body("other@mail.id", "0012345678"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "registration nisn already used");
    Ok(())
}

#[tokio::test]
async fn registration_fields_are_validated() -> Result<()> {
    let app = TestApp::spawn().await?;

    let mut payload = registration_body("rizki@mail.id", "123");
    payload["gender"] = json!("other");
    payload["date_of_birth"] = json!("12-05-2011");

    let res = app
        .client
        .post(app.url("/registrations"))
        .json(&payload)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "UNPROCESSABLE_ENTITY");
    assert_eq!(body["field_errors"]["nisn"], "must be exactly 10 characters");
    assert_eq!(body["field_errors"]["date_of_birth"], "must be a date in YYYY-MM-DD format");
    assert!(body["field_errors"].get("gender").is_some());
    assert!(body["field_errors"].get("email").is_none());
    Ok(())
}

#[tokio::test]
async fn admins_review_registrations() -> Result<()> {
    let app = TestApp::spawn().await?;
    let token = app.token_for("staff@darulabror.sch.id", Role::Admin).await?;

    for (email, nisn) in [("a@mail.id", "0000000001"), ("b@mail.id", "0000000002")] {
        app.client
            .post(app.url("/registrations"))
            .json(&registration_body(email, nisn))
            .send()
            .await?;
    }

    let res = app.client.get(app.url("/admin/registrations")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .client
        .get(app.url("/admin/registrations?page=abc&limit=500"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["meta"], json!({ "page": 1, "limit": 100, "total": 2 }));
    assert_eq!(body["data"]["items"][0]["email"], "b@mail.id");
    let id = body["data"]["items"][1]["id"].as_i64().unwrap();

    let res = app
        .client
        .get(app.url(&format!("/admin/registrations/{}", id)))
        .bearer_auth(&token)
        .send()
        .await?;
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["nisn"], "0000000001");

    let res = app
        .client
        .delete(app.url(&format!("/admin/registrations/{}", id)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .client
        .get(app.url(&format!("/admin/registrations/{}", id)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "registration not found");
    Ok(())
}

#[tokio::test]
async fn contact_messages_round_through_the_console() -> Result<()> {
    let app = TestApp::spawn().await?;
    let token = app.token_for("staff@darulabror.sch.id", Role::Admin).await?;

    let res = app
        .client
        .post(app.url("/contacts"))
        .json(&json!({
            "email": "parent@mail.id",
            "subject": "Jadwal kunjungan",
            "message": "Kapan jadwal kunjungan orang tua santri?"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    let id = body["data"]["id"].as_i64().unwrap();

    let res = app
        .client
        .post(app.url("/contacts"))
        .json(&json!({ "email": "nope", "subject": "", "message": "hi" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await?;
    assert_eq!(body["field_errors"]["subject"], "is required");

    let res = app
        .client
        .put(app.url(&format!("/admin/contacts/{}", id)))
        .bearer_auth(&token)
        .json(&json!({
            "email": "parent@mail.id",
            "subject": "Jadwal kunjungan (dijawab)",
            "message": "Kapan jadwal kunjungan orang tua santri?"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["subject"], "Jadwal kunjungan (dijawab)");

    let res = app
        .client
        .get(app.url("/admin/contacts"))
        .bearer_auth(&token)
        .send()
        .await?;
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["meta"]["total"], 1);

    let res = app
        .client
        .delete(app.url(&format!("/admin/contacts/{}", id)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .client
        .delete(app.url(&format!("/admin/contacts/{}", id)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
