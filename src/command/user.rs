//! User verbs: register, login, reset, users.

use async_trait::async_trait;
use chrono::Local;
use tracing::info;

use super::context::CommandContext;
use super::registry::{require_args, CommandHandler};
use crate::db::UserRepository;
use crate::Result;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `register <name>`: create a user and make it current.
pub struct Register;

#[async_trait(?Send)]
impl CommandHandler for Register {
    async fn run(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> Result<()> {
        let name = &require_args(args, 1, "register <name>")?[0];

        let user = UserRepository::new(ctx.db.pool()).create(name).await?;
        ctx.session.set_current_user(&user.name)?;
        info!(user = %user.name, "user registered");

        writeln!(ctx.out, "Registered and logged in as {}", user.name)?;
        writeln!(ctx.out, "ID: {}", user.id)?;
        writeln!(
            ctx.out,
            "Created At: {}",
            user.created_at.with_timezone(&Local).format(TIME_FORMAT)
        )?;
        writeln!(
            ctx.out,
            "Updated At: {}",
            user.updated_at.with_timezone(&Local).format(TIME_FORMAT)
        )?;
        Ok(())
    }
}

/// `login <name>`: make an existing user current.
pub struct Login;

#[async_trait(?Send)]
impl CommandHandler for Login {
    async fn run(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> Result<()> {
        let name = &require_args(args, 1, "login <name>")?[0];

        let user = UserRepository::new(ctx.db.pool()).get(name).await?;
        ctx.session.set_current_user(&user.name)?;
        info!(user = %user.name, "logged in");

        writeln!(ctx.out, "Logged in as {}", user.name)?;
        Ok(())
    }
}

/// `reset`: delete every user, their feeds and follows.
pub struct Reset;

#[async_trait(?Send)]
impl CommandHandler for Reset {
    async fn run(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<()> {
        let deleted = UserRepository::new(ctx.db.pool()).delete_all().await?;
        ctx.session.clear()?;

        writeln!(ctx.out, "Deleted {} users", deleted)?;
        Ok(())
    }
}

/// `users`: list users, marking the current one.
pub struct Users;

#[async_trait(?Send)]
impl CommandHandler for Users {
    async fn run(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<()> {
        let users = UserRepository::new(ctx.db.pool()).list().await?;
        let current = ctx.session.current_user().map(str::to_string);

        for user in users {
            if current.as_deref() == Some(user.name.as_str()) {
                writeln!(ctx.out, "* {} (current)", user.name)?;
            } else {
                writeln!(ctx.out, "* {}", user.name)?;
            }
        }
        Ok(())
    }
}
