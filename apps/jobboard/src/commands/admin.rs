use clap::{Args, Subcommand};

use super::jobs::print_job_row;
use super::prompt::StdinConfirm;
use crate::admin::{AdminDashboard, Confirm, Preconfirmed};
use crate::errors::AppError;
use crate::forms::JobForm;
use crate::guards::Route;
use crate::state::AppState;

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// List every posting
    List,
    /// Create a posting
    Create(JobArgs),
    /// Edit a posting; only the given fields change
    Update {
        id: String,
        #[command(flatten)]
        job: JobArgs,
    },
    /// Delete a posting
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Job form fields as flags.
#[derive(Debug, Clone, Default, Args)]
pub struct JobArgs {
    #[arg(long)]
    pub role: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub contact_email: Option<String>,
    #[arg(long)]
    pub application_link: Option<String>,
    /// yes, no, maybe or ask
    #[arg(long)]
    pub referral: Option<String>,
}

impl From<JobArgs> for JobForm {
    fn from(args: JobArgs) -> Self {
        JobForm {
            role_name: args.role.unwrap_or_default(),
            company_name: args.company.unwrap_or_default(),
            job_description: args.description.unwrap_or_default(),
            department_name: args.department,
            location: args.location,
            contact_email: args.contact_email,
            application_link: args.application_link,
            referral_status: args.referral,
        }
    }
}

impl AdminCommand {
    pub fn route(&self) -> Route {
        match self {
            AdminCommand::List | AdminCommand::Delete { .. } => Route::Admin,
            AdminCommand::Create(_) => Route::AdminCreateJob,
            AdminCommand::Update { id, .. } => Route::AdminEditJob { id: id.clone() },
        }
    }
}

pub async fn run(cmd: AdminCommand, state: &AppState) -> Result<(), AppError> {
    let token = state.session.token();
    let token = token.as_deref();
    let mut dashboard = AdminDashboard::new();

    match cmd {
        AdminCommand::List => {
            dashboard.load(&state.api, token).await?;
        }
        AdminCommand::Create(args) => {
            let created = dashboard
                .create(&state.api, &JobForm::from(args), token)
                .await?;
            println!("Job \"{}\" has been successfully created.", created.role_name);
        }
        AdminCommand::Update { id, job } => {
            let existing = state.api.get_job(&id, token).await?;
            let form = JobForm::from_job(&existing).merge(JobForm::from(job));
            let updated = dashboard.update(&state.api, &id, &form, token).await?;
            println!("Job \"{}\" has been successfully updated.", updated.role_name);
        }
        AdminCommand::Delete { id, yes } => {
            let preconfirmed = Preconfirmed(true);
            let confirm: &dyn Confirm = if yes { &preconfirmed } else { &StdinConfirm };
            if dashboard.delete(&state.api, &id, confirm, token).await? {
                println!("Job {id} has been deleted.");
            } else {
                println!("Cancelled.");
                return Ok(());
            }
        }
    }

    print_dashboard(&dashboard);
    Ok(())
}

fn print_dashboard(dashboard: &AdminDashboard) {
    println!();
    if dashboard.jobs().is_empty() {
        println!("No job postings yet.");
        return;
    }
    println!("{} job postings", dashboard.jobs().len());
    for job in dashboard.jobs() {
        print_job_row(job);
    }
}
