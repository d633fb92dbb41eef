//! Login / logout / password commands.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use super::open;

/// Login and save the token to the session file.
pub async fn login(
    user: Option<String>,
    password: Option<String>,
    config_path: &Path,
    server: Option<&str>,
) -> Result<()> {
    let username = match user {
        Some(u) => u,
        None => {
            eprint!("Username: ");
            std::io::stderr().flush()?;
            let mut s = String::new();
            std::io::stdin().read_line(&mut s)?;
            s.trim_end_matches(['\r', '\n']).to_string()
        }
    };
    let password = match password {
        Some(p) => p,
        None => rpassword::prompt_password("Password: ")?,
    };

    let mut app = open(config_path, server)?;
    let result = app.login(&username, &password).await;
    app.frontend_mut().flush();
    result?;
    Ok(())
}

/// Drop the saved token. No request is sent.
pub fn logout(config_path: &Path) -> Result<()> {
    let mut app = open(config_path, None)?;
    app.logout()?;
    println!("Logged out.");
    Ok(())
}

/// Change the logged-in student's password.
pub async fn passwd(password: Option<String>, config_path: &Path, server: Option<&str>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => {
            let pw = rpassword::prompt_password("New password: ")?;
            let confirm = rpassword::prompt_password("Confirm new password: ")?;
            if pw != confirm {
                anyhow::bail!("Passwords do not match.");
            }
            pw
        }
    };

    let mut app = open(config_path, server)?;
    app.restore_session()?;
    app.change_password(&password).await?;
    Ok(())
}

/// Report whether a token is saved. No request is sent.
pub fn status(config_path: &Path, server: Option<&str>) -> Result<()> {
    let mut app = open(config_path, server)?;
    let logged_in = app.restore_session()?;
    println!("Server:  {}", app.api().base_url());
    println!("Session: {}", if logged_in { "logged in" } else { "logged out" });
    Ok(())
}
