// Job listing view-model: URL-backed filters plus offset/limit pagination
// with a one-item lookahead standing in for a total count.

pub mod filters;
pub mod pagination;

pub use filters::JobFilters;
pub use pagination::{
    fetch_page, JobListing, JobSource, PageLink, PageRequest, PageResult, ADMIN_PAGE_LIMIT,
    DEFAULT_PAGE_SIZE,
};
