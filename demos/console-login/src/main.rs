//! Interactive console stand-in for the app's UI layer.
//!
//! Subscribes to the auth client and "redirects" between the
//! authenticated and unauthenticated views by printing which one the
//! app would show. Everything a real screen would validate before
//! calling into the client (empty fields, password confirmation) is
//! validated here, at the UI layer — the client itself only enforces
//! the password-length policy.
//!
//! Usage:
//!
//! ```text
//! console-login [storage-dir]
//! ```
//!
//! Commands: `signin <email> <password>`,
//! `signup <email> <password> <confirm>`, `whoami`, `signout`, `quit`.

use glowauth::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let store = match std::env::args().nth(1) {
        Some(dir) => FileSessionStore::at(dir),
        None => FileSessionStore::open_default()
            .unwrap_or_else(|| FileSessionStore::at(".")),
    };
    eprintln!("session record: {}", store.path().display());

    let auth = AuthClient::new(store);

    // The "navigation root": reacts to every auth transition exactly
    // once, the way the app redirects between its tab and login stacks.
    let _sub = auth.subscribe(|state: &AuthState| match state.session() {
        Some(session) => println!("→ [tabs] signed in as {session}"),
        None if state.is_resolved() => println!("→ [login] signed out"),
        None => println!("→ [splash] restoring session…"),
    });

    auth.restore().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_help();

    while let Some(line) = lines.next_line().await? {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            ["signin", email, password] => {
                match auth.sign_in(email, password).await {
                    Ok(session) => println!("welcome back, {}", session.label()),
                    Err(e) => println!("{e}"),
                }
            }
            ["signin", ..] => println!("Email and password are required"),
            ["signup", email, password, confirm] => {
                if password != confirm {
                    println!("Passwords do not match");
                    continue;
                }
                match auth.sign_up(email, password).await {
                    Ok(session) => println!("account created: {}", session.label()),
                    Err(e) => println!("{e}"),
                }
            }
            ["signup", ..] => println!("Email and password are required"),
            ["whoami"] => match auth.current_session() {
                Some(session) => println!("{session}"),
                None => println!("not signed in"),
            },
            ["signout"] => auth.sign_out().await,
            ["quit"] | ["exit"] => break,
            [] => {}
            _ => print_help(),
        }
        if auth.sync_degraded() {
            println!("(warning: last change could not be saved to disk)");
        }
    }

    Ok(())
}

fn print_help() {
    println!("commands:");
    println!("  signin <email> <password>");
    println!("  signup <email> <password> <confirm>");
    println!("  whoami");
    println!("  signout");
    println!("  quit");
}
