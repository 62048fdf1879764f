// Manual FromRow implementations for PostgreSQL
#[cfg(feature = "sqlx-postgres")]
mod sqlx_impls {
    use sqlx::postgres::PgRow;
    use sqlx::{FromRow, Row};

    use crate::types::{
        CreditTransaction, GeoPoint, Organization, PendingEmployee, PendingEmployer, Role,
        TransactionStatus, TransportMode, Trip, User,
    };

    fn geo_point(row: &PgRow, lat: &str, lng: &str) -> Result<Option<GeoPoint>, sqlx::Error> {
        let latitude: Option<f64> = row.try_get(lat)?;
        let longitude: Option<f64> = row.try_get(lng)?;
        Ok(latitude
            .zip(longitude)
            .map(|(latitude, longitude)| GeoPoint {
                latitude,
                longitude,
            }))
    }

    impl FromRow<'_, PgRow> for User {
        fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
            let role: String = row.try_get("role")?;
            Ok(Self {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                email: row.try_get("email")?,
                role: role.parse::<Role>().map_err(|e| sqlx::Error::ColumnDecode {
                    index: "role".to_string(),
                    source: Box::new(e),
                })?,
                domain: row.try_get("domain")?,
                organization_id: row.try_get("organization_id")?,
                approved: row.try_get("approved").unwrap_or(false),
                carbon_credits: row.try_get("carbon_credits").unwrap_or(0.0),
                created_at: row.try_get("created_at")?,
                last_login: row.try_get("last_login")?,
            })
        }
    }

    impl FromRow<'_, PgRow> for PendingEmployer {
        fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
            Ok(Self {
                id: row.try_get("id")?,
                full_name: row.try_get("full_name")?,
                email: row.try_get("email")?,
                organization_name: row.try_get("organization_name")?,
                organization_domain: row.try_get("organization_domain")?,
                created_at: row.try_get("created_at")?,
            })
        }
    }

    impl FromRow<'_, PgRow> for PendingEmployee {
        fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
            Ok(Self {
                id: row.try_get("id")?,
                full_name: row.try_get("full_name")?,
                email: row.try_get("email")?,
                domain: row.try_get("domain")?,
                organization_id: row.try_get("organization_id")?,
                created_at: row.try_get("created_at")?,
            })
        }
    }

    impl FromRow<'_, PgRow> for Organization {
        fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
            Ok(Self {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                domain: row.try_get("domain")?,
                total_credits: row.try_get("total_credits")?,
                carbon_credits: row.try_get("carbon_credits")?,
                available_money: row.try_get("available_money")?,
                approved: row.try_get("approved").unwrap_or(false),
                created_at: row.try_get("created_at")?,
            })
        }
    }

    impl FromRow<'_, PgRow> for CreditTransaction {
        fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
            let status: String = row.try_get("status")?;
            Ok(Self {
                id: row.try_get("id")?,
                seller_org_id: row.try_get("seller_org_id")?,
                seller_org_name: row.try_get("seller_org_name")?,
                buyer_org_id: row.try_get("buyer_org_id")?,
                buyer_org_name: row.try_get("buyer_org_name")?,
                credit_amount: row.try_get("credit_amount")?,
                price: row.try_get("price")?,
                status: TransactionStatus::from(status),
                created_at: row.try_get("created_at")?,
                completed_at: row.try_get("completed_at")?,
            })
        }
    }

    impl FromRow<'_, PgRow> for Trip {
        fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
            let mode: String = row.try_get("transport_mode")?;
            Ok(Self {
                id: row.try_get("id")?,
                user_id: row.try_get("user_id")?,
                start_location: geo_point(row, "start_latitude", "start_longitude")?,
                end_location: geo_point(row, "end_latitude", "end_longitude")?,
                start_address: row.try_get("start_address")?,
                end_address: row.try_get("end_address")?,
                start_time: row.try_get("start_time")?,
                end_time: row.try_get("end_time")?,
                trip_date: row.try_get("trip_date")?,
                distance_km: row.try_get("distance_km").unwrap_or(0.0),
                transport_mode: TransportMode::from(mode),
                carbon_credits: row.try_get("carbon_credits").unwrap_or(0.0),
                is_work_from_home: row.try_get("is_work_from_home").unwrap_or(false),
            })
        }
    }
}
