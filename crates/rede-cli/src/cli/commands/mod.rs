//! Non-interactive command implementations.
//!
//! Every command that talks to the API builds a full session manager
//! first, so the global 401 handler is installed and an expired token
//! gets cleared from disk exactly like in the interactive client.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use rede_core::api::types::Post;
use rede_core::api::{ApiClient, classify, posts, users};
use rede_core::config::Config;
use rede_core::session::{SessionManager, TokenStore, UnauthorizedRegistry};

fn build_session(config: &Config) -> Result<SessionManager> {
    let tokens = TokenStore::open_default();
    let registry = UnauthorizedRegistry::global();
    let api = Arc::new(ApiClient::new(config, tokens.clone(), Arc::clone(&registry))?);
    Ok(SessionManager::new(api, tokens, registry))
}

/// Uses the flag value when given, otherwise reads one line from stdin.
fn resolve_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    eprint!("Password: ");
    std::io::stderr().flush().ok();
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("Empty password");
    }
    Ok(password)
}

pub async fn login(config: &Config, email: &str, password: Option<String>) -> Result<()> {
    let session = build_session(config)?;
    let password = resolve_password(password)?;

    match session.sign_in(email, &password).await {
        Ok(user) => {
            println!("Signed in as {} <{}>.", user.name, user.email);
            Ok(())
        }
        Err(err) => bail!("{}", classify(&err).message),
    }
}

pub fn logout() -> Result<()> {
    let tokens = TokenStore::open_default();
    if tokens.clear()? {
        println!("Signed out.");
    } else {
        println!("Not signed in.");
    }
    Ok(())
}

pub async fn whoami(config: &Config) -> Result<()> {
    let session = build_session(config)?;
    session.hydrate().await;

    match session.current_user() {
        Some(user) => {
            println!("{} <{}> (id {})", user.name, user.email, user.id);
            Ok(())
        }
        None => bail!("Not signed in. Run `rede login`."),
    }
}

pub async fn signup(
    config: &Config,
    name: &str,
    email: &str,
    password: Option<String>,
) -> Result<()> {
    let session = build_session(config)?;
    let password = resolve_password(password)?;

    match session.sign_up(name, email, &password).await {
        Ok(user) => {
            println!("Account created. Signed in as {} <{}>.", user.name, user.email);
            Ok(())
        }
        Err(err) => bail!("{}", classify(&err).message),
    }
}

pub async fn feed(config: &Config, limit: usize, offset: usize) -> Result<()> {
    let session = build_session(config)?;
    let page = posts::feed(session.api(), limit, offset).await?;

    if page.is_empty() {
        println!("No posts.");
        return Ok(());
    }
    for post in &page {
        print_post(post);
    }
    Ok(())
}

pub async fn post(config: &Config, content: &str) -> Result<()> {
    let content = content.trim();
    if content.is_empty() {
        bail!("Nothing to post.");
    }

    let session = build_session(config)?;
    let created = posts::create(session.api(), content).await?;
    println!("Published post #{}.", created.id);
    Ok(())
}

pub async fn profile(config: &Config, user_id: i64) -> Result<()> {
    let session = build_session(config)?;
    let header = users::stats(session.api(), user_id).await?;

    println!("{} <{}>", header.user.name, header.user.email);
    println!(
        "{} posts · {} seguidores · {} seguindo",
        header.stats.posts, header.stats.followers, header.stats.following
    );

    let recent = users::posts(session.api(), user_id, 10, 0).await?;
    if !recent.is_empty() {
        println!();
        for post in &recent {
            print_post(post);
        }
    }
    Ok(())
}

fn print_post(post: &Post) {
    let mut heading = format!("#{}  {}", post.id, post.author_label());
    if let Some(when) = post.created_at_display() {
        heading.push_str(" · ");
        heading.push_str(&when);
    }
    println!("{heading}");
    println!("    {}", post.content);
}
