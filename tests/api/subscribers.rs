use crate::helpers::{body_of, spawn_app, spawn_app_without_mailing_list, TestApp};
use serde_json::json;

async fn import(app: &TestApp, emails: serde_json::Value) -> serde_json::Value {
    let response = app.post_subscribers(&json!({ "emails": emails })).await;
    assert_eq!(200, response.status().as_u16());
    body_of(response).await
}

#[tokio::test]
async fn listing_an_empty_store() {
    let app = spawn_app().await;

    let response = app.get_subscribers(&[]).await;

    assert_eq!(200, response.status().as_u16());
    let body = body_of(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["subscribers"], json!([]));
    assert_eq!(
        body["data"]["pagination"],
        json!({
            "page": 1, "limit": 50, "total": 0, "totalPages": 0,
            "hasNext": false, "hasPrev": false
        })
    );
    assert_eq!(
        body["data"]["stats"],
        json!({"total": 0, "active": 0, "unsubscribed": 0, "bounced": 0, "complained": 0})
    );
}

#[tokio::test]
async fn bulk_import_reports_every_item() {
    let app = spawn_app_without_mailing_list().await;

    let response = app
        .post_subscribers(&json!({
            "emails": [
                "ada@example.com",
                {"email": "grace@example.com", "firstName": "Grace", "lastName": "Hopper"},
                "not-an-email",
                42,
                "ada@example.com"
            ],
            "tags": ["vip", " vip ", "imported"]
        }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body = body_of(response).await;
    assert_eq!(body["message"], "Successfully imported 2 subscribers.");
    assert_eq!(
        body["data"]["summary"],
        json!({"total": 5, "successful": 2, "failed": 3})
    );
    assert_eq!(
        body["data"]["errors"],
        json!([
            {"email": "not-an-email", "error": "Invalid email format"},
            {"email": 42, "error": "Invalid email format"},
            {"email": "ada@example.com", "error": "Email already exists"}
        ])
    );

    let grace = app.stored_subscriber("grace@example.com").await;
    assert_eq!(grace.first_name.as_deref(), Some("Grace"));
    assert_eq!(grace.status, "ACTIVE");
    assert_eq!(grace.source.as_deref(), Some("bulk_import"));
    assert_eq!(grace.tags, vec!["vip".to_string(), "imported".to_string()]);
    assert_eq!(grace.mailer_list_id, None);
}

#[tokio::test]
async fn bulk_import_uses_the_given_source_and_skips_the_mailing_list() {
    let app = spawn_app().await;

    let response = app
        .post_subscribers(&json!({"emails": ["ada@example.com"], "source": "trade_show"}))
        .await;

    assert_eq!(200, response.status().as_u16());
    let saved = app.stored_subscriber("ada@example.com").await;
    assert_eq!(saved.source.as_deref(), Some("trade_show"));
    assert!(app
        .mailing_list_server
        .received_requests()
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn bulk_import_without_emails_is_rejected() {
    let app = spawn_app().await;

    for body in [json!({}), json!({"emails": []}), json!({"emails": "ada@example.com"})] {
        let response = app.post_subscribers(&body).await;

        assert_eq!(400, response.status().as_u16());
        assert_eq!(
            body_of(response).await,
            json!({"success": false, "message": "Emails array is required."})
        );
    }
}

#[tokio::test]
async fn listing_filters_by_status_and_search() {
    let app = spawn_app_without_mailing_list().await;
    import(
        &app,
        json!([
            {"email": "ada@example.com", "firstName": "Ada"},
            {"email": "grace@example.com", "firstName": "Grace"},
            "linus@example.org"
        ]),
    )
    .await;
    app.post_unsubscribe(&json!({"email": "grace@example.com"}))
        .await;

    let body = body_of(app.get_subscribers(&[("status", "UNSUBSCRIBED")]).await).await;
    let emails: Vec<_> = body["data"]["subscribers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["email"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(emails, vec!["grace@example.com"]);
    assert_eq!(body["data"]["pagination"]["total"], 1);
    // Stats ignore the filter.
    assert_eq!(
        body["data"]["stats"],
        json!({"total": 3, "active": 2, "unsubscribed": 1, "bounced": 0, "complained": 0})
    );

    let body = body_of(app.get_subscribers(&[("search", "ADA")]).await).await;
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert_eq!(body["data"]["subscribers"][0]["firstName"], "Ada");

    let body = body_of(app.get_subscribers(&[("search", "example.")]).await).await;
    assert_eq!(body["data"]["pagination"]["total"], 3);

    // Unknown statuses are ignored.
    let body = body_of(app.get_subscribers(&[("status", "DELETED")]).await).await;
    assert_eq!(body["data"]["pagination"]["total"], 3);
}

#[tokio::test]
async fn listing_is_paginated_newest_first() {
    let app = spawn_app_without_mailing_list().await;
    for email in ["one@example.com", "two@example.com", "three@example.com"] {
        import(&app, json!([email])).await;
    }

    let body = body_of(app.get_subscribers(&[("page", "2"), ("limit", "2")]).await).await;

    assert_eq!(body["data"]["subscribers"][0]["email"], "one@example.com");
    assert_eq!(body["data"]["subscribers"].as_array().unwrap().len(), 1);
    assert_eq!(
        body["data"]["pagination"],
        json!({
            "page": 2, "limit": 2, "total": 3, "totalPages": 2,
            "hasNext": false, "hasPrev": true
        })
    );

    let body = body_of(app.get_subscribers(&[("limit", "2")]).await).await;
    assert_eq!(body["data"]["subscribers"][0]["email"], "three@example.com");
    assert_eq!(body["data"]["pagination"]["hasNext"], true);
}

#[tokio::test]
async fn unparsable_paging_falls_back_to_defaults() {
    let app = spawn_app().await;

    let body = body_of(
        app.get_subscribers(&[("page", "abc"), ("limit", "9999")])
            .await,
    )
    .await;

    assert_eq!(body["data"]["pagination"]["page"], 1);
    assert_eq!(body["data"]["pagination"]["limit"], 200);
}
