mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_reports_memory_storage() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["storage"], "memory");
    Ok(())
}

#[tokio::test]
async fn error_view_is_public() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/error")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await?.contains("An error occurred"));
    Ok(())
}

#[tokio::test]
async fn screens_redirect_anonymous_visitors_to_login() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    for path in ["/", "/users", "/projects", "/roles/new"] {
        let res = client.get(server.url(path)).send().await?;
        assert_eq!(res.status(), StatusCode::SEE_OTHER, "{}", path);
    }

    let res = client.get(server.url("/roles")).send().await?;
    assert_eq!(res.headers()["location"], "/login");
    Ok(())
}
