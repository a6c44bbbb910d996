//! Offset/limit pagination over `GET /jobs/`.
//!
//! The service returns no total count. For page `p` we request
//! `skip = (p-1) * page_size`, `limit = page_size`:
//!
//! - fewer than `page_size` items: the page is terminal and
//!   `total = skip + returned`.
//! - a full page: one lookahead request (same filters,
//!   `skip = p * page_size`, `limit = 1`). An empty lookahead gives
//!   `total = p * page_size`; otherwise `total = p * page_size + 1`, which
//!   only signals that another page exists.
//!
//! Each planned fetch carries a generation number. Results whose generation
//! is older than the listing's current one are dropped on apply, so a
//! superseded response can never overwrite fresher state.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::filters::JobFilters;
use crate::errors::AppError;
use crate::models::JobPosting;

pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Window used by the admin dashboard, which lists without paging.
pub const ADMIN_PAGE_LIMIT: usize = 100;
const LOOKAHEAD_LIMIT: usize = 1;

/// Anything that can answer a filtered job query.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch_jobs(
        &self,
        filters: &JobFilters,
        token: Option<&str>,
    ) -> Result<Vec<JobPosting>, AppError>;
}

pub fn skip_for_page(page: usize, page_size: usize) -> usize {
    page.saturating_sub(1) * page_size
}

/// Total-count estimate from the page result and the optional lookahead.
pub fn estimate_total(
    page: usize,
    page_size: usize,
    returned: usize,
    lookahead: Option<usize>,
) -> usize {
    let skip = skip_for_page(page, page_size);
    if returned < page_size {
        return skip + returned;
    }
    match lookahead {
        Some(0) | None => page * page_size,
        Some(_) => page * page_size + 1,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    pub filters: JobFilters,
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    pub fn skip(&self) -> usize {
        skip_for_page(self.page, self.page_size)
    }

    pub fn page_filters(&self) -> JobFilters {
        self.filters.paged(self.skip(), self.page_size)
    }

    pub fn lookahead_filters(&self) -> JobFilters {
        self.filters
            .paged(self.page * self.page_size, LOOKAHEAD_LIMIT)
    }
}

#[derive(Debug, Clone)]
pub struct PageResult {
    pub request: PageRequest,
    pub jobs: Vec<JobPosting>,
    pub total_jobs: usize,
}

/// Runs the page query and, for a full page, the lookahead query.
pub async fn fetch_page<S>(
    source: &S,
    request: PageRequest,
    token: Option<&str>,
) -> Result<PageResult, AppError>
where
    S: JobSource + ?Sized,
{
    let jobs = source.fetch_jobs(&request.page_filters(), token).await?;

    let lookahead = if jobs.len() >= request.page_size {
        let next = source
            .fetch_jobs(&request.lookahead_filters(), token)
            .await?;
        Some(next.len())
    } else {
        None
    };

    let total_jobs = estimate_total(request.page, request.page_size, jobs.len(), lookahead);
    debug!(
        "Fetched page {} ({} jobs, total estimate {})",
        request.page,
        jobs.len(),
        total_jobs
    );

    Ok(PageResult {
        request,
        jobs,
        total_jobs,
    })
}

/// One entry of the pager: a page number, or a gap between shown numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(usize),
    Gap,
}

/// State of the job listing view.
#[derive(Debug, Clone)]
pub struct JobListing {
    filters: JobFilters,
    page_size: usize,
    current_page: usize,
    jobs: Vec<JobPosting>,
    total_jobs: usize,
    generation: u64,
    loaded: bool,
    error: Option<String>,
}

impl JobListing {
    pub fn new(filters: JobFilters, page_size: usize) -> Self {
        Self {
            filters: filters.unpaged(),
            page_size: page_size.max(1),
            current_page: 1,
            jobs: Vec::new(),
            total_jobs: 0,
            generation: 0,
            loaded: false,
            error: None,
        }
    }

    /// Opens the listing on a given page, e.g. a deep link. Page changes after
    /// that go through `change_page`.
    pub fn starting_at(mut self, page: usize) -> Self {
        self.current_page = page.max(1);
        self
    }

    pub fn filters(&self) -> &JobFilters {
        &self.filters
    }

    /// Query string reflecting the current filters.
    pub fn to_query(&self) -> String {
        self.filters.to_query()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn jobs(&self) -> &[JobPosting] {
        &self.jobs
    }

    pub fn total_jobs(&self) -> usize {
        self.total_jobs
    }

    pub fn total_pages(&self) -> usize {
        self.total_jobs.div_ceil(self.page_size)
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn loaded_empty(&self) -> bool {
        self.loaded && self.error.is_none() && self.jobs.is_empty()
    }

    /// Nothing matched at all: the first page came back empty.
    pub fn is_empty_result(&self) -> bool {
        self.loaded_empty() && self.current_page == 1
    }

    /// A deep link beyond the last page: a later page came back empty, so
    /// the total estimate says nothing about how many jobs exist.
    pub fn is_past_end(&self) -> bool {
        self.loaded_empty() && self.current_page > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.total_jobs > self.current_page * self.page_size
    }

    /// Replaces the filters, resets to page 1 and invalidates in-flight fetches.
    pub fn set_filters(&mut self, filters: JobFilters) {
        let filters = filters.unpaged();
        if filters != self.filters {
            self.filters = filters;
            self.current_page = 1;
            self.generation += 1;
        }
    }

    /// Moves to `target` if it is reachable. Returns false (and changes
    /// nothing) otherwise; forward moves are allowed whenever the lookahead
    /// said more data may exist.
    pub fn change_page(&mut self, target: usize) -> bool {
        let reachable = target >= 1 && (target <= self.total_pages() || self.has_next_page());
        if !reachable {
            debug!(
                "Ignoring page change to {} (total pages {})",
                target,
                self.total_pages()
            );
            return false;
        }
        if target != self.current_page {
            self.current_page = target;
            self.generation += 1;
        }
        true
    }

    /// Plans the fetch for the current page under a fresh generation.
    pub fn plan(&mut self) -> PageRequest {
        self.generation += 1;
        PageRequest {
            generation: self.generation,
            filters: self.filters.clone(),
            page: self.current_page,
            page_size: self.page_size,
        }
    }

    /// Applies a fetched page. Returns false if the result is stale.
    pub fn apply(&mut self, result: PageResult) -> bool {
        if result.request.generation != self.generation {
            debug!(
                "Dropping stale page result (generation {} < {})",
                result.request.generation, self.generation
            );
            return false;
        }
        self.current_page = result.request.page;
        self.jobs = result.jobs;
        self.total_jobs = result.total_jobs;
        self.loaded = true;
        self.error = None;
        true
    }

    /// Records a failed fetch for the given request, unless it is stale.
    pub fn apply_error(&mut self, request: &PageRequest, err: &AppError) -> bool {
        if request.generation != self.generation {
            return false;
        }
        warn!("Failed to fetch jobs: {}", err);
        self.jobs.clear();
        self.loaded = true;
        self.error = Some(err.to_string());
        true
    }

    /// Plans, fetches and applies the current page.
    pub async fn refresh<S>(&mut self, source: &S, token: Option<&str>) -> Result<(), AppError>
    where
        S: JobSource + ?Sized,
    {
        let request = self.plan();
        match fetch_page(source, request.clone(), token).await {
            Ok(result) => {
                self.apply(result);
                Ok(())
            }
            Err(err) => {
                self.apply_error(&request, &err);
                Err(err)
            }
        }
    }

    /// Page numbers to show: first, last, the neighbours of the current page,
    /// or every page when there are five or fewer.
    pub fn page_window(&self) -> Vec<PageLink> {
        let total = self.total_pages();
        let current = self.current_page;
        let mut links = Vec::new();
        let mut last_shown = 0;

        for page in 1..=total {
            let shown = total <= 5
                || page == 1
                || page == total
                || (page + 1 >= current && page <= current + 1);
            if !shown {
                continue;
            }
            if last_shown != 0 && page > last_shown + 1 {
                links.push(PageLink::Gap);
            }
            links.push(PageLink::Page(page));
            last_shown = page;
        }

        links
    }
}
