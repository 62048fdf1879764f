use chrono::{DateTime, Utc};

use crate::types::{
    CreateOrganization, CreatePendingEmployee, CreatePendingEmployer, CreateTrip, CreateUser,
    Organization, PendingEmployee, PendingEmployer, Trip, UpdateOrganization, UpdateUser, User,
};

/// Construction of stored records from creation data.
pub trait MemoryRecord: Clone + Send + Sync + 'static {
    type Create;

    fn from_create(id: String, create: &Self::Create, now: DateTime<Utc>) -> Self;
}

/// Merge-style updates for stored records.
pub trait MemoryUpdate: MemoryRecord {
    type Update;

    fn apply_update(&mut self, update: &Self::Update);
}

impl MemoryRecord for User {
    type Create = CreateUser;

    fn from_create(id: String, create: &CreateUser, now: DateTime<Utc>) -> Self {
        User {
            id,
            name: create.name.clone(),
            email: create.email.clone(),
            role: create.role,
            domain: create.domain.clone(),
            organization_id: create.organization_id.clone(),
            approved: create.approved,
            carbon_credits: create.carbon_credits,
            created_at: create.created_at.unwrap_or(now),
            last_login: create.last_login,
        }
    }
}

impl MemoryUpdate for User {
    type Update = UpdateUser;

    fn apply_update(&mut self, update: &UpdateUser) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(email) = &update.email {
            self.email = email.clone();
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(domain) = &update.domain {
            self.domain = Some(domain.clone());
        }
        if let Some(organization_id) = &update.organization_id {
            self.organization_id = Some(organization_id.clone());
        }
        if let Some(approved) = update.approved {
            self.approved = approved;
        }
        if let Some(carbon_credits) = update.carbon_credits {
            self.carbon_credits = carbon_credits;
        }
        if let Some(last_login) = update.last_login {
            self.last_login = Some(last_login);
        }
    }
}

impl MemoryRecord for Organization {
    type Create = CreateOrganization;

    fn from_create(id: String, create: &CreateOrganization, now: DateTime<Utc>) -> Self {
        Organization {
            id,
            name: create.name.clone(),
            domain: create.domain.clone(),
            total_credits: create.total_credits,
            carbon_credits: create.carbon_credits,
            available_money: create.available_money,
            approved: create.approved,
            created_at: now,
        }
    }
}

impl MemoryUpdate for Organization {
    type Update = UpdateOrganization;

    fn apply_update(&mut self, update: &UpdateOrganization) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(domain) = &update.domain {
            self.domain = domain.clone();
        }
        if let Some(total_credits) = update.total_credits {
            self.total_credits = total_credits;
        }
        if let Some(carbon_credits) = update.carbon_credits {
            self.carbon_credits = carbon_credits;
        }
        if let Some(available_money) = update.available_money {
            self.available_money = available_money;
        }
        if let Some(approved) = update.approved {
            self.approved = approved;
        }
    }
}

impl MemoryRecord for PendingEmployer {
    type Create = CreatePendingEmployer;

    fn from_create(id: String, create: &CreatePendingEmployer, now: DateTime<Utc>) -> Self {
        PendingEmployer {
            id,
            full_name: create.full_name.clone(),
            email: create.email.clone(),
            organization_name: create.organization_name.clone(),
            organization_domain: create.organization_domain.clone(),
            created_at: now,
        }
    }
}

impl MemoryRecord for PendingEmployee {
    type Create = CreatePendingEmployee;

    fn from_create(id: String, create: &CreatePendingEmployee, now: DateTime<Utc>) -> Self {
        PendingEmployee {
            id,
            full_name: create.full_name.clone(),
            email: create.email.clone(),
            domain: create.domain.clone(),
            organization_id: create.organization_id.clone(),
            created_at: now,
        }
    }
}

impl MemoryRecord for Trip {
    type Create = CreateTrip;

    fn from_create(id: String, create: &CreateTrip, _now: DateTime<Utc>) -> Self {
        Trip {
            id,
            user_id: create.user_id.clone(),
            start_location: create.start_location,
            end_location: create.end_location,
            start_address: create.start_address.clone(),
            end_address: create.end_address.clone(),
            start_time: create.start_time,
            end_time: create.end_time,
            trip_date: create.trip_date,
            distance_km: create.distance_km,
            transport_mode: create.transport_mode,
            carbon_credits: create.carbon_credits,
            is_work_from_home: create.is_work_from_home,
        }
    }
}
