#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "integration-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // In-memory storage keeps each test binary independent of any database
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_limbr-admin"));
        cmd.env("APP_ENV", "development")
            .env("LIMBR_STORAGE", "memory")
            .env_remove("DATABASE_URL")
            .env("LIMBR_HOST", "127.0.0.1")
            .env("LIMBR_PORT", port.to_string())
            .env("SECURITY_ADMIN_USERNAME", ADMIN_USERNAME)
            .env("SECURITY_ADMIN_PASSWORD", ADMIN_PASSWORD)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Browser-like client: keeps cookies and follows redirects
pub fn browser() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().cookie_store(true).build()?)
}

/// Client logged in as the bootstrap administrator
pub async fn logged_in(server: &TestServer) -> Result<reqwest::Client> {
    let client = browser()?;
    let res = client
        .post(server.url("/login"))
        .form(&[("username", ADMIN_USERNAME), ("password", ADMIN_PASSWORD)])
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
    Ok(client)
}

/// Post an editor action for `table` with extra form fields
pub async fn editor_action(
    client: &reqwest::Client,
    server: &TestServer,
    table: &str,
    action: &str,
    fields: &[(&str, &str)],
) -> Result<reqwest::Response> {
    let mut form: Vec<(&str, &str)> = vec![("action", action)];
    form.extend_from_slice(fields);
    Ok(client
        .post(server.url(&format!("/{}/editor", table)))
        .form(&form)
        .send()
        .await?)
}
