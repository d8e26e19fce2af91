//! Print an Argon2id hash suitable for seeding the first administrator.
//!
//! Usage: `cargo run --example hash_password -- <username> <password>`

use clubhub_server::auth::hash_password;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let (Some(username), Some(password)) = (args.next(), args.next()) else {
        anyhow::bail!("Usage: hash_password <username> <password>");
    };

    let hash = hash_password(&password)?;
    println!(
        "INSERT INTO users (id, username, email, password_hash, is_admin) \
         VALUES (gen_random_uuid(), '{username}', '', '{hash}', true);"
    );
    Ok(())
}
