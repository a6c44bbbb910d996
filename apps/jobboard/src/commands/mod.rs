//! Command-line front end. Every subcommand stands in for one page: it
//! runs that page's route guard against the current session, then does
//! the page's fetching or submission.

pub mod admin;
pub mod ai;
pub mod auth;
pub mod jobs;
pub mod prompt;

use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::guards::{Decision, Guard, Route};
use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "jobboard", version)]
#[command(about = "Browse and manage job postings from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Request a one-time code by email and sign in with it
    Login {
        #[arg(long)]
        email: String,
        /// The 6-digit code; prompted for when omitted
        #[arg(long)]
        otp: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Complete your profile
    Profile {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        mobile_number: String,
    },
    /// Browse job postings
    #[command(subcommand)]
    Jobs(jobs::JobsCommand),
    /// Manage job postings (administrators only)
    #[command(subcommand)]
    Admin(admin::AdminCommand),
    /// AI job insights
    #[command(subcommand)]
    Ai(ai::AiCommand),
}

impl Command {
    /// The page this command stands in for. `None` runs unguarded.
    pub fn route(&self) -> Option<Route> {
        match self {
            Command::Login { .. } => Some(Route::login()),
            Command::Logout | Command::Whoami => None,
            Command::Profile { .. } => Some(Route::CompleteProfile { redirect: None }),
            Command::Jobs(cmd) => Some(cmd.route()),
            Command::Admin(cmd) => Some(cmd.route()),
            Command::Ai(_) => Some(Route::home()),
        }
    }
}

pub async fn run(cli: Cli, state: &AppState) -> Result<(), AppError> {
    let route = cli.command.route();

    if let Some(route) = &route {
        if !enter(state, route) {
            return Ok(());
        }
    }

    let result = match cli.command {
        Command::Login { email, otp } => auth::login(state, &email, otp.as_deref()).await,
        Command::Logout => auth::logout(state).await,
        Command::Whoami => auth::whoami(state),
        Command::Profile {
            full_name,
            mobile_number,
        } => auth::complete_profile(state, &full_name, &mobile_number).await,
        Command::Jobs(cmd) => jobs::run(cmd, state).await,
        Command::Admin(cmd) => admin::run(cmd, state).await,
        Command::Ai(cmd) => ai::run(cmd, state).await,
    };

    if let Err(err) = &result {
        if err.is_auth_failure() {
            debug!("Authentication failure (status {:?}); ending session", err.status());
            let current = route.unwrap_or_else(Route::home);
            if let Some(next) = state.session.logout(&current).await {
                println!("{}", redirect_hint(&current, &next));
            }
        }
    }

    result
}

/// Runs the guard for `route`. Returns false when the command must not run.
fn enter(state: &AppState, route: &Route) -> bool {
    let mut guard = Guard::new(route.clone());
    match guard.check(&state.session.snapshot()) {
        Decision::Render => true,
        Decision::Wait => {
            warn!("Session still loading; refusing to run {}", route.path());
            false
        }
        Decision::Redirect(target) => {
            debug!("Guard redirect {} -> {}", route.path(), target.path());
            println!("{}", redirect_hint(route, &target));
            false
        }
    }
}

/// What a redirect means for someone at a terminal.
pub fn redirect_hint(from: &Route, to: &Route) -> String {
    match to {
        Route::Login { .. } => {
            "You are not logged in. Run `jobboard login --email <email>`.".to_string()
        }
        Route::CompleteProfile { .. } => "Your profile is incomplete. Run \
            `jobboard profile --full-name <name> --mobile-number <number>`."
            .to_string(),
        Route::Jobs { .. } if from.is_admin_only() => {
            "This page requires administrator access.".to_string()
        }
        _ if from.is_auth_flow() => format!("Already done; continue at {}", to.path()),
        _ => format!("Continue at {}", to.path()),
    }
}
