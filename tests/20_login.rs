mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn admin_login_returns_usable_token() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server
        .client
        .post(server.url("/login"))
        .json(&json!({ "UserName": "admin", "Password": "admin" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    let token = body["data"]["token"].as_str().unwrap_or_default();
    assert!(!token.is_empty(), "token missing: {}", body);
    assert!(body.get("token").is_none(), "token belongs under data: {}", body);
    assert_eq!(body["data"]["expiresIn"], 7200);

    // The issued token verifies and carries the username as subject
    let claims = server.tokens().validate(token)?;
    assert_eq!(claims.sub, "admin");
    assert_eq!(claims.iss, common::ISSUER);
    assert_eq!(claims.aud, common::AUDIENCE);

    // ...and opens protected routes
    let res = server
        .client
        .get(server.url("/categorias"))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_invalid_login() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server
        .client
        .post(server.url("/login"))
        .json(&json!({ "UserName": "admin", "Password": "wrong" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Login inválido");
    Ok(())
}

#[tokio::test]
async fn missing_or_malformed_body_is_invalid_data() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let empty = server.client.post(server.url("/login")).send().await?;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
    assert_eq!(empty.json::<Value>().await?["error"], "Dados inválidos");

    let null_user = server
        .client
        .post(server.url("/login"))
        .json(&json!({ "UserName": null, "Password": "admin" }))
        .send()
        .await?;
    assert_eq!(null_user.status(), StatusCode::BAD_REQUEST);
    assert_eq!(null_user.json::<Value>().await?["error"], "Dados inválidos");
    Ok(())
}

#[tokio::test]
async fn consecutive_logins_issue_distinct_valid_tokens() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let first = server.login().await?;
    let second = server.login().await?;
    assert_ne!(first, second);

    for token in [&first, &second] {
        let res = server
            .client
            .get(server.url("/produtos"))
            .bearer_auth(token)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
    }
    Ok(())
}
