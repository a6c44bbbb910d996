use clap::Subcommand;
use tracing::warn;

use crate::api::SuggestionKind;
use crate::errors::AppError;
use crate::guards::Route;
use crate::insights::{recommend_training_resources, suggest_similar_jobs};
use crate::listing::filters::{COMPANY_NAME, DEPARTMENT_NAME, LOCATION, ROLE_NAME};
use crate::listing::{JobFilters, JobListing, PageLink};
use crate::models::JobPosting;
use crate::state::AppState;

#[derive(Debug, Subcommand)]
pub enum JobsCommand {
    /// List postings, optionally filtered
    List {
        /// Raw filter query string, e.g. `RoleName=SRE&Location=Berlin`
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Show one posting
    Show {
        id: String,
        /// Also ask the model for similar jobs and training resources
        #[arg(long)]
        insights: bool,
    },
    /// Autocomplete values known to the service
    Suggestions {
        #[arg(value_enum)]
        kind: SuggestionKind,
    },
}

impl JobsCommand {
    pub fn route(&self) -> Route {
        match self {
            JobsCommand::List { .. } => Route::Jobs {
                query: self.filters().map(|f| f.to_query()).unwrap_or_default(),
            },
            JobsCommand::Show { id, .. } => Route::JobDetail { id: id.clone() },
            JobsCommand::Suggestions { .. } => Route::home(),
        }
    }

    /// Query-string filters with the explicit flags layered on top.
    fn filters(&self) -> Option<JobFilters> {
        let JobsCommand::List {
            query,
            role,
            company,
            location,
            department,
            ..
        } = self
        else {
            return None;
        };

        let mut filters = JobFilters::from_query(query).unpaged();
        for (key, value) in [
            (ROLE_NAME, role),
            (COMPANY_NAME, company),
            (LOCATION, location),
            (DEPARTMENT_NAME, department),
        ] {
            if value.is_some() {
                filters.set(key, value.as_deref());
            }
        }
        Some(filters)
    }
}

pub async fn run(cmd: JobsCommand, state: &AppState) -> Result<(), AppError> {
    let token = state.session.token();
    let token = token.as_deref();

    match &cmd {
        JobsCommand::List { page, .. } => {
            let filters = cmd.filters().unwrap_or_default();
            let mut listing = JobListing::new(filters, state.config.page_size).starting_at(*page);
            listing.refresh(&state.api, token).await?;
            print_listing(&listing);
        }
        JobsCommand::Show { id, insights } => {
            let job = state.api.get_job(id, token).await?;
            print_job(&job);
            if *insights {
                print_insights(state, &job).await;
            }
        }
        JobsCommand::Suggestions { kind } => {
            let list = state.api.suggestions(*kind, token).await?;
            if list.suggestions.is_empty() {
                println!("No {kind} known yet.");
            }
            for suggestion in list.suggestions {
                println!("{suggestion}");
            }
        }
    }
    Ok(())
}

pub(crate) fn print_job_row(job: &JobPosting) {
    let location = job.location.as_deref().unwrap_or("-");
    println!(
        "{:>6}  {}  @ {}  ({})",
        job.id, job.role_name, job.company_name, location
    );
}

/// `role "SRE" at "Acme" in "Berlin"`, or None without criteria.
fn describe_criteria(filters: &JobFilters) -> Option<String> {
    let parts: Vec<String> = [
        ("role", filters.role_name()),
        ("at", filters.company_name()),
        ("in", filters.location()),
        ("department", filters.department_name()),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.map(|v| format!("{label} \"{v}\"")))
    .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

fn print_listing(listing: &JobListing) {
    if listing.is_past_end() {
        println!(
            "Page {} is past the last page of results. Start again with --page 1.",
            listing.current_page()
        );
        return;
    }
    if listing.is_empty_result() {
        if listing.filters().has_criteria() {
            println!("No jobs found matching your criteria.");
        } else {
            println!("No jobs found.");
        }
        return;
    }

    if let Some(criteria) = describe_criteria(listing.filters()) {
        println!("Jobs for {criteria}");
    }
    for job in listing.jobs() {
        print_job_row(job);
    }

    let pager: Vec<String> = listing
        .page_window()
        .into_iter()
        .map(|link| match link {
            PageLink::Page(p) if p == listing.current_page() => format!("[{p}]"),
            PageLink::Page(p) => p.to_string(),
            PageLink::Gap => "...".to_string(),
        })
        .collect();
    println!();
    println!(
        "Page {} of {}  {}",
        listing.current_page(),
        listing.total_pages(),
        pager.join(" ")
    );
    if listing.has_next_page() {
        println!("More jobs available: --page {}", listing.current_page() + 1);
    } else {
        println!("{} jobs in total", listing.total_jobs());
    }
}

fn print_job(job: &JobPosting) {
    println!("{} at {}", job.role_name, job.company_name);
    println!("Posted {}", job.posting_date.format("%Y-%m-%d"));
    for (label, value) in [
        ("Department", &job.department_name),
        ("Location", &job.location),
        ("Contact", &job.contact_email),
        ("Apply", &job.application_link),
    ] {
        if let Some(value) = value {
            println!("{label}: {value}");
        }
    }
    if let Some(status) = job
        .referral_status
        .as_deref()
        .and_then(crate::models::ReferralStatus::parse)
    {
        println!("Referral: {}", status.label());
    }
    println!();
    println!("{}", job.job_description);
}

/// Insights never fail the command; problems are reported inline.
async fn print_insights(state: &AppState, job: &JobPosting) {
    let Some(llm) = state.llm.as_deref() else {
        println!();
        println!("AI insights unavailable: ANTHROPIC_API_KEY is not set.");
        return;
    };

    let user_input = format!("{} at {}", job.role_name, job.company_name);
    println!();
    match suggest_similar_jobs(&user_input, llm).await {
        Ok(similar) => {
            println!("Similar job titles: {}", similar.job_title_suggestions.join(", "));
            println!("Companies to explore: {}", similar.company_suggestions.join(", "));
        }
        Err(e) => {
            warn!("Similar jobs failed: {}", e);
            println!("Failed to load suggestions. Please try again later.");
        }
    }

    match recommend_training_resources(&job.job_description, llm).await {
        Ok(resources) if resources.training_resources.is_empty() => {
            println!("No training resources found.");
        }
        Ok(resources) => {
            println!("Training resources:");
            for resource in resources.training_resources {
                println!("  - {resource}");
            }
        }
        Err(e) => {
            warn!("Training resources failed: {}", e);
            println!("Failed to load training resources.");
        }
    }
}
