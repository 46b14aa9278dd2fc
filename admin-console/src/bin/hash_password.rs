//! Generate the argon2 hash for `AUTH__ADMIN_PASSWORD_HASH`
//! Run with: cargo run --bin hash-password -- <password>

use admin_console::services::hash_password;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let password = match std::env::args().nth(1) {
        Some(password) => password,
        None => std::env::var("ADMIN_PASSWORD")
            .map_err(|_| anyhow::anyhow!("Pass the password as an argument or set ADMIN_PASSWORD"))?,
    };

    if password.len() < 12 {
        anyhow::bail!("Password must be at least 12 characters");
    }

    println!("Hashing password...");
    let password_hash = hash_password(&password)?;

    println!();
    println!("AUTH__ADMIN_PASSWORD_HASH='{}'", password_hash);

    Ok(())
}
