mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn login_requires_username_and_password() -> Result<()> {
    let server = common::ensure_server().await?;
    let url = format!("{}/api/auth/login", server.base_url);

    // Distinct client key so the attempt budget of other tests is untouched
    let res = client()
        .post(&url)
        .header("x-forwarded-for", "10.9.0.1")
        .json(&json!({ "password": "rahasia" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "Username wajib diisi");

    let res = client()
        .post(&url)
        .header("x-forwarded-for", "10.9.0.1")
        .json(&json!({ "username": "admin" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "Password wajib diisi");

    Ok(())
}

#[tokio::test]
async fn sixth_attempt_in_the_window_is_throttled() -> Result<()> {
    let server = common::ensure_server().await?;
    let url = format!("{}/api/auth/login", server.base_url);

    // Five attempts are allowed; validation failures still burn budget
    for _ in 0..5 {
        let res = client()
            .post(&url)
            .header("x-forwarded-for", "10.9.0.2")
            .json(&json!({}))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    let res = client()
        .post(&url)
        .header("x-forwarded-for", "10.9.0.2")
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(
        body["error"],
        "Terlalu banyak percobaan login. Coba lagi dalam 1 menit."
    );

    Ok(())
}

#[tokio::test]
async fn throttling_is_per_client() -> Result<()> {
    let server = common::ensure_server().await?;
    let url = format!("{}/api/auth/login", server.base_url);

    for _ in 0..6 {
        client()
            .post(&url)
            .header("x-forwarded-for", "10.9.0.3")
            .json(&json!({}))
            .send()
            .await?;
    }

    // A different client still has its full budget
    let res = client()
        .post(&url)
        .header("x-forwarded-for", "10.9.0.4")
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
