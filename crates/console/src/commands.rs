//! CLI commands

use crate::view::UserDetailView;
use anyhow::{Context, Result};
use clap::Subcommand;
use keystone_core::{
    Action, ResourceKind, TabStatus, UserWithRoles, check, translate_grant, translate_role,
};
use keystone_http::ConsoleClient;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the signed-in user and their grants
    Whoami,

    /// Show the records a user is attached to
    Relations {
        /// User whose relations to show
        #[arg(long)]
        user: String,

        /// Only this relation tab (customers, properties, projects, licensings)
        #[arg(long)]
        tab: Option<ResourceKind>,
    },

    /// List records of one kind
    List {
        /// Resource kind, e.g. `customers`
        kind: ResourceKind,
    },

    /// Attach or detach users
    Members {
        #[command(subcommand)]
        command: MemberCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum MemberCommands {
    /// Attach a user to a record
    Add {
        #[arg(long)]
        kind: ResourceKind,

        /// Record the user joins
        #[arg(long)]
        entity: String,

        #[arg(long)]
        user: String,
    },

    /// Delete a membership row
    Remove {
        #[arg(long)]
        kind: ResourceKind,

        #[arg(long)]
        membership: String,

        /// User the membership belongs to
        #[arg(long)]
        user: String,
    },
}

impl Commands {
    pub async fn execute<W: Write>(self, client: &ConsoleClient, out: &mut W) -> Result<()> {
        let session = client
            .current_user()
            .await
            .context("failed to resolve the signed-in user")?;
        info!(user = %session.id, "session resolved");

        match self {
            Commands::Whoami => {
                writeln!(out, "{} ({})", session.display_name(), session.id)?;
                for grant in &session.roles {
                    let actions: Vec<&str> = Action::ALL
                        .into_iter()
                        .filter(|action| grant.allows(*action))
                        .map(translate_grant)
                        .collect();
                    writeln!(
                        out,
                        "  {:<12} {}",
                        translate_role(grant.resource),
                        if actions.is_empty() {
                            "-".to_string()
                        } else {
                            actions.join(", ")
                        }
                    )?;
                }
                Ok(())
            }
            Commands::Relations { user, tab } => {
                let view = UserDetailView::new(session, user, Arc::new(client.clone()));
                let tabs = match tab {
                    Some(kind) if !kind.is_relation() => {
                        anyhow::bail!("{kind} is not a relation tab")
                    }
                    Some(kind) => vec![kind],
                    None => view.visible_tabs(),
                };
                show_relations(&view, &tabs, out).await
            }
            Commands::List { kind } => {
                check(&session, kind, Action::View)?;
                for entity in client.list(kind).await? {
                    writeln!(out, "{}\t{}", entity.id, entity.display_name())?;
                }
                Ok(())
            }
            Commands::Members { command } => command.execute(session, client, out).await,
        }
    }
}

impl MemberCommands {
    async fn execute<W: Write>(
        self,
        session: UserWithRoles,
        client: &ConsoleClient,
        out: &mut W,
    ) -> Result<()> {
        match self {
            MemberCommands::Add { kind, entity, user } => {
                let view = UserDetailView::new(session, user, Arc::new(client.clone()));
                let record = view.add_membership(kind, &entity).await?;
                writeln!(out, "Added membership {}", record.id)?;
                Ok(())
            }
            MemberCommands::Remove {
                kind,
                membership,
                user,
            } => {
                let view = UserDetailView::new(session, user, Arc::new(client.clone()));
                view.remove_membership(kind, &membership).await?;
                writeln!(out, "Removed membership {membership}")?;
                Ok(())
            }
        }
    }
}

async fn show_relations<W: Write>(
    view: &UserDetailView,
    tabs: &[ResourceKind],
    out: &mut W,
) -> Result<()> {
    if tabs.is_empty() {
        writeln!(out, "No relation tabs visible")?;
        return Ok(());
    }

    for kind in tabs {
        view.select_tab(*kind)?;
    }

    for kind in tabs {
        let Some(state) = view.wait_settled(*kind).await else {
            anyhow::bail!("view closed before {kind} finished loading");
        };

        match state.status() {
            TabStatus::Errored => writeln!(out, "{}: failed to load", translate_role(*kind))?,
            _ => {
                writeln!(out, "{} ({})", translate_role(*kind), state.items.len())?;
                for entity in &state.items {
                    writeln!(out, "  {}\t{}", entity.id, entity.display_name())?;
                }
            }
        }
    }

    view.teardown();
    Ok(())
}
