mod common;

use anyhow::Result;
use reqwest::StatusCode;

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn me_requires_a_session_cookie() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = client()
        .get(format!("{}/api/auth/me", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body.get("error").is_some(), "error body expected: {}", body);

    Ok(())
}

#[tokio::test]
async fn unknown_token_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = client()
        .get(format!("{}/api/auth/me", server.base_url))
        .header("cookie", "session_token=not-a-real-token")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn valid_session_reaches_me() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = client()
        .get(format!("{}/api/auth/me", server.base_url))
        .header("cookie", format!("session_token={}", common::ADMIN_TOKEN))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["username"], "admin");
    assert_eq!(body["role"], "ADMIN");

    Ok(())
}

#[tokio::test]
async fn non_admin_cannot_write_academic_years() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = client()
        .post(format!("{}/api/academic-years", server.base_url))
        .header("cookie", format!("session_token={}", common::SISWA_TOKEN))
        .json(&serde_json::json!({ "name": "2026/2027" }))
        .send()
        .await?;

    // Wrong role looks the same as no session
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn database_failures_stay_generic() -> Result<()> {
    let server = common::ensure_server().await?;

    // The harness pool points at a dead address, so the query itself fails
    let res = client()
        .get(format!("{}/api/academic-years", server.base_url))
        .header("cookie", format!("session_token={}", common::ADMIN_TOKEN))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<serde_json::Value>().await?;
    let message = body["error"].as_str().unwrap_or_default().to_lowercase();
    assert!(
        !message.contains("postgres") && !message.contains("sqlx"),
        "internal detail leaked to client: {}",
        body
    );

    Ok(())
}

#[tokio::test]
async fn external_routes_require_the_api_key() -> Result<()> {
    let server = common::ensure_server().await?;
    let url = format!("{}/api/external/students", server.base_url);

    let missing = client().get(&url).send().await?;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let wrong = client().get(&url).header("x-api-key", "nope").send().await?;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    // Correct key clears the gate; the dead pool then yields a 500
    let right = client()
        .get(&url)
        .header("x-api-key", common::API_KEY)
        .send()
        .await?;
    assert_ne!(right.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(right.status(), StatusCode::INTERNAL_SERVER_ERROR);

    Ok(())
}

#[tokio::test]
async fn external_routes_ignore_session_cookies() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = client()
        .get(format!("{}/api/external/teachers", server.base_url))
        .header("cookie", format!("session_token={}", common::ADMIN_TOKEN))
        .send()
        .await?;

    // A session is not a substitute for the key
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = client().get(format!("{}/", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["name"], "sekolah-api");
    assert!(body.get("endpoints").is_some());

    Ok(())
}
