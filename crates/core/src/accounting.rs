//! Pure credit arithmetic over trip records.

use chrono::Datelike;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::types::Trip;

/// Bucket used by [`credits_by_transport_mode`] for work-from-home trips.
pub const WORK_FROM_HOME_BUCKET: &str = "workFromHome";

/// Earned credits of an employee set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreditSummary {
    pub total: f64,
    /// Every employee of the set, including those without trips.
    #[serde(rename = "perEmployee")]
    pub per_employee: HashMap<String, f64>,
}

impl CreditSummary {
    pub fn employee_total(&self, user_id: &str) -> f64 {
        self.per_employee.get(user_id).copied().unwrap_or(0.0)
    }
}

/// Sum `carbon_credits` globally and per employee.
///
/// Trips whose `user_id` is outside `employee_ids` are ignored.
pub fn aggregate_credits<'a, I>(employee_ids: I, trips: &[Trip]) -> CreditSummary
where
    I: IntoIterator<Item = &'a str>,
{
    let mut per_employee: HashMap<String, f64> = employee_ids
        .into_iter()
        .map(|id| (id.to_string(), 0.0))
        .collect();
    let mut total = 0.0;

    for trip in trips {
        if let Some(sum) = per_employee.get_mut(&trip.user_id) {
            *sum += trip.carbon_credits;
            total += trip.carbon_credits;
        }
    }

    CreditSummary {
        total,
        per_employee,
    }
}

/// Credits per transport mode. Work-from-home days are counted under
/// [`WORK_FROM_HOME_BUCKET`] whatever mode they carry.
pub fn credits_by_transport_mode(trips: &[Trip]) -> BTreeMap<String, f64> {
    let mut buckets = BTreeMap::new();
    for trip in trips {
        let key = if trip.is_work_from_home {
            WORK_FROM_HOME_BUCKET
        } else {
            trip.transport_mode.as_str()
        };
        *buckets.entry(key.to_string()).or_insert(0.0) += trip.carbon_credits;
    }
    buckets
}

/// Credits per calendar month of `trip_date`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCredits {
    /// `"M/YYYY"`, e.g. `"3/2024"`.
    pub month: String,
    pub credits: f64,
    pub trips: usize,
}

/// Group trips by month, oldest month first.
pub fn trips_by_month(trips: &[Trip]) -> Vec<MonthlyCredits> {
    let mut months: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
    for trip in trips {
        let key = (trip.trip_date.year(), trip.trip_date.month());
        let entry = months.entry(key).or_insert((0.0, 0));
        entry.0 += trip.carbon_credits;
        entry.1 += 1;
    }

    months
        .into_iter()
        .map(|((year, month), (credits, trips))| MonthlyCredits {
            month: format!("{}/{}", month, year),
            credits,
            trips,
        })
        .collect()
}
