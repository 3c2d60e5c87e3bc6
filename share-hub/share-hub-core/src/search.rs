//! In-memory profile search: filter, deterministic sort, offset pagination.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::{Profile, PublicProfile};
use crate::store::RecordStore;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

/// Raw search parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileQuery {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    /// Parse `page`/`limit`. Both must be positive integers; `limit` is
    /// capped at [`MAX_LIMIT`] rather than rejected.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self> {
        let page = match page.map(str::trim) {
            None | Some("") => DEFAULT_PAGE,
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| Error::bad_request("page must be a positive integer"))?,
        };
        let limit = match limit.map(str::trim) {
            None | Some("") => DEFAULT_LIMIT,
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|l| *l >= 1)
                .ok_or_else(|| Error::bad_request("limit must be a positive integer"))?,
        };
        Ok(Self {
            page,
            limit: limit.min(MAX_LIMIT),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    pub profiles: Vec<PublicProfile>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

/// Lowercased filter values; empty filters are dropped.
#[derive(Debug, Default)]
struct Filters {
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}

impl Filters {
    fn from_query(q: &ProfileQuery) -> Self {
        fn norm(v: &Option<String>) -> Option<String> {
            v.as_deref()
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase)
        }
        Self {
            email: norm(&q.email),
            first_name: norm(&q.first_name),
            last_name: norm(&q.last_name),
        }
    }

    fn matches(&self, p: &Profile) -> bool {
        fn hit(filter: &Option<String>, field: &str) -> bool {
            filter
                .as_ref()
                .map_or(true, |f| field.to_lowercase().contains(f.as_str()))
        }
        hit(&self.email, &p.email) && hit(&self.first_name, &p.first_name) && hit(&self.last_name, &p.last_name)
    }
}

/// Email ascending (case-insensitive), then ID ascending.
fn profile_order(a: &Profile, b: &Profile) -> Ordering {
    a.email
        .to_lowercase()
        .cmp(&b.email.to_lowercase())
        .then_with(|| a.id.cmp(&b.id))
}

fn filter_and_sort(profiles: Vec<Profile>, query: &ProfileQuery) -> Vec<Profile> {
    let filters = Filters::from_query(query);
    let mut matched: Vec<Profile> = profiles.into_iter().filter(|p| filters.matches(p)).collect();
    matched.sort_by(profile_order);
    matched
}

fn paginate<T: Clone>(items: &[T], req: PageRequest) -> Vec<T> {
    let total = items.len();
    let start = (req.page - 1).saturating_mul(req.limit);
    if start >= total {
        return Vec::new();
    }
    let end = (start + req.limit).min(total);
    items[start..end].to_vec()
}

/// Run a search over an already loaded profile collection.
pub fn search_profiles(profiles: Vec<Profile>, query: &ProfileQuery) -> Result<SearchPage> {
    let req = PageRequest::parse(query.page.as_deref(), query.limit.as_deref())?;
    Ok(page_of(profiles, query, req))
}

fn page_of(profiles: Vec<Profile>, query: &ProfileQuery, req: PageRequest) -> SearchPage {
    let matched = filter_and_sort(profiles, query);
    let page = paginate(&matched, req);
    SearchPage {
        profiles: page.into_iter().map(PublicProfile::from).collect(),
        total: matched.len(),
        page: req.page,
        limit: req.limit,
    }
}

#[derive(Clone)]
pub struct ProfileSearch {
    store: Arc<dyn RecordStore>,
}

impl ProfileSearch {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn search(&self, query: &ProfileQuery) -> Result<SearchPage> {
        // Validate pagination before loading the whole collection.
        let req = PageRequest::parse(query.page.as_deref(), query.limit.as_deref())?;
        let profiles = self.store.all_profiles().await?;
        let page = page_of(profiles, query, req);
        tracing::debug!(total = page.total, page = page.page, limit = page.limit, "profile search");
        Ok(page)
    }
}
