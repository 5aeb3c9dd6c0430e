mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use common::{TestApp, SECRET};
use tools_manufacturer_api::auth::{Claims, TokenService};

fn admin_routes() -> Vec<(Method, String)> {
    let id = ObjectId::new().to_hex();
    vec![
        (Method::GET, "/user".to_string()),
        (Method::PUT, "/user/admin/alice@example.com".to_string()),
        (Method::GET, "/product".to_string()),
        (Method::POST, "/product".to_string()),
        (Method::DELETE, "/product/alice@example.com".to_string()),
        (Method::POST, "/item".to_string()),
        (Method::DELETE, format!("/item/{}", id)),
    ]
}

fn body_for(method: &Method) -> Option<serde_json::Value> {
    if *method == Method::POST {
        Some(json!({ "name": "Impact Driver" }))
    } else {
        None
    }
}

#[tokio::test]
async fn admin_routes_without_credential_are_missing_credential() -> Result<()> {
    let app = TestApp::new();

    for (method, uri) in admin_routes() {
        let body = body_for(&method);
        let (status, json) = app.request(method.clone(), &uri, None, body).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(json["code"], "MISSING_CREDENTIAL", "{} {}", method, uri);
    }
    Ok(())
}

#[tokio::test]
async fn tampered_or_expired_credentials_are_invalid() -> Result<()> {
    let app = TestApp::new();
    app.seed_user("root@example.com", "admin").await;

    let foreign = format!("Bearer {}", TokenService::new("someone-else", 10).issue("root@example.com")?);

    let past = Utc::now() - Duration::days(20);
    let expired_claims = Claims {
        email: "root@example.com".to_string(),
        iat: past.timestamp(),
        exp: (past + Duration::days(10)).timestamp(),
    };
    let expired = format!(
        "Bearer {}",
        encode(&Header::default(), &expired_claims, &EncodingKey::from_secret(SECRET.as_bytes()))?
    );

    for credential in [foreign.as_str(), expired.as_str(), "Bearer not.a.jwt", "no-space-token"] {
        for (method, uri) in admin_routes() {
            let body = body_for(&method);
            let (status, json) = app.request(method.clone(), &uri, Some(credential), body).await?;
            assert_eq!(status, StatusCode::FORBIDDEN, "{} {} with {}", method, uri, credential);
            assert_eq!(json["code"], "INVALID_CREDENTIAL");
        }
    }
    Ok(())
}

#[tokio::test]
async fn non_admin_is_forbidden_and_unknown_identity_is_clean() -> Result<()> {
    let app = TestApp::new();
    app.seed_user("user@example.com", "none").await;

    let (status, json) = app.get("/product", Some(&app.bearer("user@example.com"))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");

    let (status, json) = app.get("/product", Some(&app.bearer("ghost@example.com"))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "UNKNOWN_IDENTITY");
    Ok(())
}

#[tokio::test]
async fn granting_admin_takes_effect_for_existing_token() -> Result<()> {
    let app = TestApp::new();

    // Sign-in upsert issues alice's credential
    let (status, json) = app
        .request(Method::PUT, "/user/alice@example.com", None, Some(json!({ "name": "Alice" })))
        .await?;
    assert_eq!(status, StatusCode::OK);
    let alice = format!("Bearer {}", json["data"]["token"].as_str().expect("token"));

    let (status, json) = app.get("/product", Some(&alice)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");

    let root = app.admin("root@example.com").await;
    let (status, _) = app
        .request(Method::PUT, "/user/admin/alice@example.com", Some(&root), None)
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = app.get("/product", Some(&alice)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], json!([]));

    let (_, json) = app.get("/admin/alice@example.com", None).await?;
    assert_eq!(json["data"]["admin"], true);
    Ok(())
}

#[tokio::test]
async fn granting_admin_to_unknown_user_is_not_found() -> Result<()> {
    let app = TestApp::new();
    let root = app.admin("root@example.com").await;

    let (status, json) = app
        .request(Method::PUT, "/user/admin/nobody@example.com", Some(&root), None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn role_in_profile_upsert_is_ignored() -> Result<()> {
    let app = TestApp::new();

    let (status, _) = app
        .request(
            Method::PUT,
            "/user/mallory@example.com",
            None,
            Some(json!({ "name": "Mallory", "role": "admin", "email": "root@example.com" })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = app.get("/admin/mallory@example.com", None).await?;
    assert_eq!(json["data"]["admin"], false);

    let (status, _) = app.get("/user", Some(&app.bearer("mallory@example.com"))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn admin_status_of_unknown_email_is_false() -> Result<()> {
    let app = TestApp::new();
    let (status, json) = app.get("/admin/nobody@example.com", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["admin"], false);
    Ok(())
}

#[tokio::test]
async fn buyer_filtered_bookings_require_that_buyers_credential() -> Result<()> {
    let app = TestApp::new();
    for (tool, buyer) in [("Drill", "alice@example.com"), ("Saw", "bob@example.com")] {
        app.request(Method::POST, "/booking", None, Some(json!({ "toolName": tool, "buyer": buyer })))
            .await?;
    }

    let (status, json) = app.get("/booking?buyer=alice@example.com", None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "MISSING_CREDENTIAL");

    let (status, json) = app
        .get("/booking?buyer=alice@example.com", Some(&app.bearer("bob@example.com")))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");

    let (status, json) = app
        .get("/booking?buyer=alice@example.com", Some(&app.bearer("alice@example.com")))
        .await?;
    assert_eq!(status, StatusCode::OK);
    let bookings = json["data"].as_array().expect("array");
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["toolName"], "Drill");

    let (status, json) = app.get("/booking", None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "MISSING_CREDENTIAL");

    let (status, json) = app.get("/booking", Some(&app.bearer("bob@example.com"))).await?;
    assert_eq!(status, StatusCode::OK);
    let bookings = json["data"].as_array().expect("array");
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["buyer"], "bob@example.com");

    let root = app.admin("root@example.com").await;
    let (status, json) = app.get("/booking", Some(&root)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn credential_token_is_exactly_the_text_after_the_first_space() -> Result<()> {
    let app = TestApp::new();
    let root = app.admin("root@example.com").await;

    let (status, _) = app.get("/product", Some(&root)).await?;
    assert_eq!(status, StatusCode::OK);

    let doubled = root.replacen(' ', "  ", 1);
    let (status, json) = app.get("/product", Some(&doubled)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "INVALID_CREDENTIAL");

    let trailing = format!("{} ", root);
    let (status, json) = app.get("/product", Some(&trailing)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "INVALID_CREDENTIAL");
    Ok(())
}
