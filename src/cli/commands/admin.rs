//! Admin flag command handler

use crate::config::Config;
use crate::db::Store;
use crate::services::auth_service::normalize_email;

pub async fn cmd_set_admin(config: &Config, email: &str, is_admin: bool) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let email = normalize_email(email);

    if !store.users().set_admin(&email, is_admin).await? {
        anyhow::bail!("No account found for {email}");
    }

    if is_admin {
        println!("✓ {email} is now an admin");
    } else {
        println!("✓ Admin access revoked for {email}");
    }

    Ok(())
}
