use url::form_urlencoded;

pub const ROLE_NAME: &str = "RoleName";
pub const COMPANY_NAME: &str = "CompanyName";
pub const LOCATION: &str = "Location";
pub const DEPARTMENT_NAME: &str = "DepartmentName";
const SKIP: &str = "skip";
const LIMIT: &str = "limit";

/// Listing filters. The query string is the source of truth: build these with
/// [`JobFilters::from_query`] and write them back with [`JobFilters::to_query`].
/// Blank values are never stored, so the two directions round-trip exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilters {
    role_name: Option<String>,
    company_name: Option<String>,
    location: Option<String>,
    department_name: Option<String>,
    skip: Option<usize>,
    limit: Option<usize>,
}

impl JobFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string (leading `?` optional). Unknown keys are ignored;
    /// for repeated keys the first occurrence wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut filters = JobFilters::default();
        let mut seen: Vec<String> = Vec::new();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if seen.iter().any(|k| k.as_str() == &*key) {
                continue;
            }
            seen.push(key.to_string());

            match &*key {
                SKIP => filters.skip = value.trim().parse().ok(),
                LIMIT => filters.limit = value.trim().parse().ok(),
                other => filters.set(other, Some(&*value)),
            }
        }

        filters
    }

    /// Serializes to a query string without a leading `?`, in a fixed key order.
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.query_pairs() {
            serializer.append_pair(key, &value);
        }
        serializer.finish()
    }

    /// Set pairs only, in the order the service documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        for (key, value) in [
            (ROLE_NAME, &self.role_name),
            (COMPANY_NAME, &self.company_name),
            (LOCATION, &self.location),
            (DEPARTMENT_NAME, &self.department_name),
        ] {
            if let Some(value) = value {
                pairs.push((key, value.clone()));
            }
        }
        if let Some(skip) = self.skip {
            pairs.push((SKIP, skip.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push((LIMIT, limit.to_string()));
        }
        pairs
    }

    /// Sets or clears a filter by its wire name. Blank values clear it.
    pub fn set(&mut self, key: &str, value: Option<&str>) {
        let value = value
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string);
        match key {
            ROLE_NAME => self.role_name = value,
            COMPANY_NAME => self.company_name = value,
            LOCATION => self.location = value,
            DEPARTMENT_NAME => self.department_name = value,
            _ => {}
        }
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.set(key, Some(value));
        self
    }

    pub fn role_name(&self) -> Option<&str> {
        self.role_name.as_deref()
    }

    pub fn company_name(&self) -> Option<&str> {
        self.company_name.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn department_name(&self) -> Option<&str> {
        self.department_name.as_deref()
    }

    pub fn skip(&self) -> Option<usize> {
        self.skip
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Same filters, given window.
    pub fn paged(&self, skip: usize, limit: usize) -> Self {
        JobFilters {
            skip: Some(skip),
            limit: Some(limit),
            ..self.clone()
        }
    }

    /// Same filters, no window.
    pub fn unpaged(&self) -> Self {
        JobFilters {
            skip: None,
            limit: None,
            ..self.clone()
        }
    }

    pub fn has_criteria(&self) -> bool {
        self.role_name.is_some()
            || self.company_name.is_some()
            || self.location.is_some()
            || self.department_name.is_some()
    }
}
