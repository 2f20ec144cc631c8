//! Read-only batch analysis of the service collection: revenue, turnaround,
//! monthly grouping, and category distribution. Everything here is a pure
//! function of the fetched services plus an optional period filter; nothing
//! is cached or mutated.

use crate::error::StoreError;
use crate::models::{parse_timestamp, Service, ServiceCategory, ServiceStatus};
use crate::store::{StoreClient, SERVICES};
use chrono::Datelike;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Optional year/month restriction, matched against the exit date. While a
/// filter is set, services without a parseable exit date are excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl StatsFilter {
    pub const ALL: StatsFilter = StatsFilter {
        year: None,
        month: None,
    };

    pub fn year(year: i32) -> Self {
        StatsFilter {
            year: Some(year),
            month: None,
        }
    }

    pub fn month(year: i32, month: u32) -> Self {
        StatsFilter {
            year: Some(year),
            month: Some(month),
        }
    }
}

/// One delivered service inside a monthly bucket, for the drill-down table.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyServiceDetail {
    pub id: String,
    pub category: ServiceCategory,
    pub product_brand: String,
    pub total: f64,
    pub exit_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyRevenue {
    /// `YYYY-MM` grouping key.
    pub key: String,
    pub revenue: f64,
    pub services: Vec<MonthlyServiceDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryShare {
    pub category: ServiceCategory,
    pub count: usize,
    /// Share of all counted services, one decimal. Zero-percent entries are
    /// dropped before this struct is built.
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceStats {
    /// Sum of budget totals over delivered services only.
    pub total_revenue: f64,
    pub active_count: usize,
    pub delivered_count: usize,
    /// Mean turnaround in whole days, one decimal; `None` when no delivered
    /// service has a usable timestamp pair ("N/A" in the UI).
    pub avg_service_days: Option<f64>,
    /// Ascending by key.
    pub monthly_revenue: Vec<MonthlyRevenue>,
    /// Descending by count.
    pub category_distribution: Vec<CategoryShare>,
}

impl ServiceStats {
    pub fn is_empty(&self) -> bool {
        self.total_revenue == 0.0 && self.active_count == 0 && self.delivered_count == 0
    }
}

pub async fn get_statistics(store: &StoreClient, filter: &StatsFilter) -> Result<ServiceStats, StoreError> {
    let services: Vec<Service> = store.list(SERVICES).await?;
    Ok(analyze_services(&services, filter))
}

pub fn analyze_services(services: &[Service], filter: &StatsFilter) -> ServiceStats {
    let filtered: Vec<&Service> = services
        .iter()
        .filter(|service| matches_filter(service, filter))
        .collect();

    // Zero-total budgets carry no revenue and stay out of the monthly
    // grouping.
    let delivered_with_revenue: Vec<&&Service> = filtered
        .iter()
        .filter(|service| service.status == ServiceStatus::Delivered && service.budget.total > 0.0)
        .collect();

    let total_revenue: f64 = delivered_with_revenue
        .iter()
        .map(|service| service.budget.total)
        .sum();

    let delivered_count = filtered
        .iter()
        .filter(|service| service.status == ServiceStatus::Delivered)
        .count();
    let active_count = filtered.len() - delivered_count;

    ServiceStats {
        total_revenue,
        active_count,
        delivered_count,
        avg_service_days: average_turnaround(&filtered),
        monthly_revenue: monthly_revenue(&delivered_with_revenue),
        category_distribution: category_distribution(&filtered),
    }
}

fn matches_filter(service: &Service, filter: &StatsFilter) -> bool {
    if filter.year.is_none() && filter.month.is_none() {
        return true;
    }
    let Some(exit) = service.exit_date.as_deref().and_then(parse_timestamp) else {
        return false;
    };
    if filter.year.is_some_and(|year| exit.year() != year) {
        return false;
    }
    if filter.month.is_some_and(|month| exit.month() != month) {
        return false;
    }
    true
}

/// Whole days from intake to delivery, rounded up, averaged over delivered
/// services. Services with a missing or unparseable timestamp, or an exit
/// before their entry, are excluded.
fn average_turnaround(filtered: &[&Service]) -> Option<f64> {
    let mut total_days = 0i64;
    let mut counted = 0u32;

    for service in filtered {
        if service.status != ServiceStatus::Delivered {
            continue;
        }
        let Some(entry) = parse_timestamp(&service.entry_date) else {
            continue;
        };
        let Some(exit) = service.exit_date.as_deref().and_then(parse_timestamp) else {
            continue;
        };
        if exit < entry {
            continue;
        }

        let elapsed = (exit - entry).num_seconds() as f64;
        total_days += (elapsed / SECONDS_PER_DAY).ceil() as i64;
        counted += 1;
    }

    if counted == 0 {
        return None;
    }
    Some(round_one_decimal(total_days as f64 / f64::from(counted)))
}

fn monthly_revenue(delivered: &[&&Service]) -> Vec<MonthlyRevenue> {
    let mut buckets: BTreeMap<String, MonthlyRevenue> = BTreeMap::new();

    for service in delivered {
        let Some(exit_raw) = service.exit_date.as_deref() else {
            continue;
        };
        let Some(exit) = parse_timestamp(exit_raw) else {
            continue;
        };

        let key = format!("{}-{:02}", exit.year(), exit.month());
        let bucket = buckets.entry(key.clone()).or_insert_with(|| MonthlyRevenue {
            key,
            revenue: 0.0,
            services: Vec::new(),
        });
        bucket.revenue += service.budget.total;
        bucket.services.push(MonthlyServiceDetail {
            id: service.id.clone(),
            category: service.category,
            product_brand: service.product_brand.clone(),
            total: service.budget.total,
            exit_date: exit_raw.to_string(),
        });
    }

    buckets.into_values().collect()
}

fn category_distribution(filtered: &[&Service]) -> Vec<CategoryShare> {
    let mut counts: HashMap<ServiceCategory, usize> = HashMap::new();
    for service in filtered {
        *counts.entry(service.category).or_default() += 1;
    }

    let total: usize = counts.values().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut shares: Vec<CategoryShare> = counts
        .into_iter()
        .map(|(category, count)| CategoryShare {
            category,
            count,
            percentage: round_one_decimal(count as f64 / total as f64 * 100.0),
        })
        .filter(|share| share.percentage > 0.0)
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

/// Years that appear in exit dates, newest first. Drives the filter dropdown.
pub fn available_years(services: &[Service]) -> Vec<i32> {
    let mut years: Vec<i32> = services
        .iter()
        .filter_map(|service| service.exit_date.as_deref())
        .filter_map(parse_timestamp)
        .map(|exit| exit.year())
        .collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Months with exits in the given year, ascending.
pub fn available_months(services: &[Service], year: i32) -> Vec<u32> {
    let mut months: Vec<u32> = services
        .iter()
        .filter_map(|service| service.exit_date.as_deref())
        .filter_map(parse_timestamp)
        .filter(|exit| exit.year() == year)
        .map(|exit| exit.month())
        .collect();
    months.sort_unstable();
    months.dedup();
    months
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
