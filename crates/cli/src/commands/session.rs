//! Login, logout, whoami.

use super::Context;

/// Exchange a Google id-token for a Sunbird session.
pub async fn login(ctx: &Context, id_token: &str) -> Result<(), Box<dyn std::error::Error>> {
    let user = ctx.auth().login_with_google(id_token).await?;
    println!("signed in as {} <{}> ({})", user.name, user.email, user.role);
    Ok(())
}

/// Sign out; the local session is gone even if the backend call fails.
pub async fn logout(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = ctx.auth().logout().await {
        tracing::warn!("logout notification failed: {err}");
    }
    println!("signed out");
    Ok(())
}

/// Show the signed-in user.
pub fn whoami(ctx: &Context) {
    match ctx.session.user() {
        Some(user) => {
            let admin = if ctx.session.is_admin() { " [admin]" } else { "" };
            println!("{} <{}>{admin}", user.name, user.email);
        }
        None => println!("not signed in"),
    }
}
