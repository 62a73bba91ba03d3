use anyhow::{Context, Result, bail};
use roster_config::Config;
use roster_core::{
    database::{RedisStore, UserRepository},
    demo::{self, DemoSeedOptions},
    query::{SortDirection, SortKey, UserListing},
    user::User,
};
use tracing::info;
use uuid::Uuid;

use crate::cli::{AppArgs, Command};

/// Orderings printed by `demo`, with their headings.
const DEMO_ORDERINGS: [(&str, SortKey, SortDirection); 5] = [
    ("Order by joined_at ...", SortKey::None, SortDirection::Asc),
    ("Order by created_at ...", SortKey::CreatedAt, SortDirection::Asc),
    ("Order by updated_at ...", SortKey::UpdatedAt, SortDirection::Asc),
    ("Order by email ...", SortKey::Email, SortDirection::Desc),
    ("Order by score ...", SortKey::Score, SortDirection::Desc),
];

pub async fn run(command: Command, config: &Config) -> Result<()> {
    let store = RedisStore::connect(&config.redis.url)
        .await
        .with_context(|| format!("failed to connect to {}", config.redis.url))?;
    let users = UserRepository::new(store, config.keys.clone());

    match command {
        Command::Seed {
            app,
            users: count,
            with_scores,
        } => {
            // Seeding may start a brand new application.
            let app_id = app
                .app_id
                .or_else(|| config.app_id.clone())
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            let opts = DemoSeedOptions {
                users: count.unwrap_or(config.seed.users),
                email_domain: config.seed.email_domain.clone(),
                with_scores: with_scores || config.seed.with_scores,
            };
            let ids = demo::seed_app_users(&users, &app_id, &opts)
                .await
                .context("seeding users failed")?;
            println!("Seeded {} users into application {app_id}", ids.len());
        }
        Command::PrepareScores { app } => {
            let app_id = resolve_app_id(&app, config)?;
            println!("Preparing user scores ...");
            let written = demo::prepare_scores(&users, &app_id)
                .await
                .context("score preparation failed")?;
            println!("Scored {written} users");
        }
        Command::List {
            app,
            sort_by,
            direction,
        } => {
            let app_id = resolve_app_id(&app, config)?;
            let listing = UserListing::new(users);
            let listed = listing
                .list(&app_id, sort_by, direction)
                .await
                .with_context(|| {
                    format!("listing by {sort_by} {direction} failed")
                })?;
            print_users(&listed);
        }
        Command::Demo { app } => {
            let app_id = resolve_app_id(&app, config)?;
            println!("Preparing user scores ...");
            demo::prepare_scores(&users, &app_id)
                .await
                .context("score preparation failed")?;

            let listing = UserListing::new(users);
            for (heading, key, direction) in DEMO_ORDERINGS {
                println!("\n{heading}");
                let listed = listing
                    .list(&app_id, key, direction)
                    .await
                    .with_context(|| {
                        format!("listing by {key} {direction} failed")
                    })?;
                print_users(&listed);
            }
        }
    }

    Ok(())
}

fn resolve_app_id(app: &AppArgs, config: &Config) -> Result<String> {
    match app.app_id.clone().or_else(|| config.app_id.clone()) {
        Some(id) if !id.trim().is_empty() => {
            info!("Using application {}", id);
            Ok(id)
        }
        _ => bail!("no application id: pass --app or set ROSTER_APP_ID"),
    }
}

fn print_users(users: &[User]) {
    for user in users {
        println!("{user}");
    }
}
