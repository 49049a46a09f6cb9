//! # Login Command
//!
//! Checks a username and password and prints the session that would be
//! issued. Sessions are not stored anywhere, so each invocation stands on
//! its own.

use clap::Args;
use serde::Serialize;
use shopease_core::Session;

use crate::commands::Context;
use crate::error::CliResult;

#[derive(Debug, Args)]
pub struct LoginArgs {
    pub username: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResult {
    #[serde(flatten)]
    session: Session,
    expires_at: chrono::DateTime<chrono::Utc>,
}

pub async fn handle(ctx: &Context, args: LoginArgs) -> CliResult<()> {
    let session = ctx
        .store
        .users()
        .authenticate(&args.username, &args.password)
        .await?;

    let result = LoginResult {
        expires_at: session.expires_at(),
        session,
    };
    ctx.emit(&result, |ctx, r| {
        let user = &r.session.user;
        ctx.line(format!(
            "✓ Logged in as {} ({}, {})",
            user.username,
            user.name,
            user.role.as_str()
        ));
        ctx.line(format!("  Session  {}", r.session.token));
        ctx.line(format!("  Expires  {}", r.expires_at.format("%Y-%m-%d %H:%M UTC")));
    })
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{context, joined, json_context, run};
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_default_admin_login() {
        let ctx = context().await;
        run(&ctx, &["login", "admin", "--password", "admin123"]).await.unwrap();
        assert!(joined(&ctx).contains("✓ Logged in as admin (Administrator, admin)"));
    }

    #[tokio::test]
    async fn test_json_session() {
        let ctx = json_context().await;
        run(&ctx, &["login", "cashier", "--password", "cashier123"]).await.unwrap();

        let value: serde_json::Value = serde_json::from_str(&joined(&ctx)).unwrap();
        assert_eq!(value["user"]["role"], "cashier");
        assert!(value["token"].is_string());
        assert!(value["expiresAt"].is_string());
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let ctx = context().await;
        let err = run(&ctx, &["login", "admin", "--password", "nope"])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
        assert_eq!(err.message, "Invalid username or password");
    }
}
