mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn product_crud_round() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let token = server.login().await?;
    let category = server.create_category(&token, "Escritório").await?;
    let category_id = category["categoriaId"].as_i64().unwrap_or_default();

    let created = server.create_product(&token, "Grampeador", category_id).await?;
    assert_eq!(created["produtoId"], 1);
    assert_eq!(created["preco"], 12.5);
    assert_eq!(created["estoque"], 4);
    assert_eq!(created["categoriaId"], category_id);
    assert_eq!(created["dataCompra"], "2024-05-10T10:00:00Z");

    let res = server
        .client
        .put(server.url("/produtos/1"))
        .bearer_auth(&token)
        .json(&json!({
            "produtoId": 1,
            "nome": "Grampeador Industrial",
            "descricao": "metal",
            "preco": 49.9,
            "imagem": null,
            "dataCompra": "2024-06-01T08:30:00Z",
            "estoque": 1,
            "categoriaId": category_id
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?["data"].clone();
    assert_eq!(updated["produtoId"], 1);
    assert_eq!(updated["nome"], "Grampeador Industrial");
    assert_eq!(updated["preco"], 49.9);
    assert!(updated["imagem"].is_null());
    assert_eq!(updated["estoque"], 1);

    let res = server
        .client
        .delete(server.url("/produtos/1"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = server
        .client
        .get(server.url("/produtos/1"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?["error"], "Produto 1 não encontrado...");
    Ok(())
}

#[tokio::test]
async fn put_with_mismatched_id_is_invalid_data() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let token = server.login().await?;

    let res = server
        .client
        .put(server.url("/produtos/5"))
        .bearer_auth(&token)
        .json(&json!({ "produtoId": 6, "nome": "X", "categoriaId": 1 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["error"], "Dados inválidos");
    Ok(())
}

#[tokio::test]
async fn product_in_unknown_category_is_invalid_data() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let token = server.login().await?;

    let res = server
        .client
        .post(server.url("/produtos"))
        .bearer_auth(&token)
        .json(&json!({ "nome": "Órfão", "preco": 1, "categoriaId": 77 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["error"], "Dados inválidos");

    let list = server
        .client
        .get(server.url("/produtos"))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(list["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn deleting_category_removes_its_products() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let token = server.login().await?;
    let kept = server.create_category(&token, "Fica").await?;
    let dropped = server.create_category(&token, "Sai").await?;
    let kept_id = kept["categoriaId"].as_i64().unwrap_or_default();
    let dropped_id = dropped["categoriaId"].as_i64().unwrap_or_default();

    server.create_product(&token, "A", kept_id).await?;
    server.create_product(&token, "B", dropped_id).await?;

    let res = server
        .client
        .delete(server.url(&format!("/categorias/{}", dropped_id)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let list = server
        .client
        .get(server.url("/produtos"))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    let products = list["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["nome"], "A");
    Ok(())
}

#[tokio::test]
async fn non_numeric_id_is_not_found() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let token = server.login().await?;

    let res = server
        .client
        .get(server.url("/produtos/abc"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn price_is_stored_at_two_decimals() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let token = server.login().await?;
    let category = server.create_category(&token, "Mercado").await?;

    let res = server
        .client
        .post(server.url("/produtos"))
        .bearer_auth(&token)
        .json(&json!({
            "nome": "Arroz",
            "preco": "10.999",
            "dataCompra": "2024-05-10T10:00:00",
            "categoriaId": category["categoriaId"]
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let created = res.json::<Value>().await?["data"].clone();
    assert_eq!(created["preco"], 11.0);
    assert_eq!(created["dataCompra"], "2024-05-10T10:00:00Z");
    Ok(())
}

#[tokio::test]
async fn price_too_large_is_invalid_data() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let token = server.login().await?;
    let category = server.create_category(&token, "Luxo").await?;

    let res = server
        .client
        .post(server.url("/produtos"))
        .bearer_auth(&token)
        .json(&json!({
            "nome": "Iate",
            "preco": "1000000000000",
            "categoriaId": category["categoriaId"]
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["error"], "Dados inválidos");
    Ok(())
}
