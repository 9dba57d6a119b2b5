mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn root_shows_banner() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server.client.get(server.url("/")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Catálogo de Produtos - 2024");
    Ok(())
}

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server.client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_json_404() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server.client.get(server.url("/nao-existe")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string(), "error message missing: {}", body);
    Ok(())
}

#[tokio::test]
async fn public_routes_ignore_bad_tokens() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server
        .client
        .get(server.url("/"))
        .bearer_auth("definitely.not.valid")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}
