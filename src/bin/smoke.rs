//! Drives a running server end to end: register, log in, fetch the
//! current user. Progress is reported through the alert queue the same
//! way the UI would surface it.

use anyhow::Context;
use devconnect::client::{
    alerts::{AlertBus, AlertKind},
    api::{ApiClient, Session},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "smoke=info".into()))
        .init();

    let base_url =
        std::env::var("SMOKE_BASE_URL").unwrap_or_else(|_| "http://localhost:4000".into());
    let client = ApiClient::new(&base_url)?;
    let alerts = AlertBus::new();

    let email = format!("smoke-{}@example.com", uuid::Uuid::new_v4().simple());
    let password = "hunter42";

    let _ = client
        .register("Smoke Test", &email, password)
        .await
        .context("register")?;
    alerts.push("Registered", AlertKind::Success);

    let token = client.login(&email, password).await.context("login")?;
    let session = Session::authenticated(token);
    alerts.push("Logged in", AlertKind::Success);

    let me = client
        .current_user(&session)
        .await
        .context("current user")?;
    alerts.push(format!("Hello, {}", me.name), AlertKind::Info);

    // A fresh account has no profile yet; the 404 surfaces like the UI
    // would show it, as a danger alert.
    if let Err(e) = client.own_profile(&session).await {
        alerts.push(format!("Profile lookup: {e:#}"), AlertKind::Danger);
    }

    for alert in alerts.snapshot() {
        println!("[{:?}] {}", alert.kind, alert.message);
    }
    println!("smoke ok: {} <{}>", me.name, me.email);
    Ok(())
}
