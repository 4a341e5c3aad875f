//! `SeaORM` entity definitions.

pub mod contract_units;
pub mod contracts;
pub mod invoices;
pub mod properties;
pub mod property_assignments;
pub mod sea_orm_active_enums;
pub mod tenants;
pub mod termination_requests;
pub mod units;
pub mod users;
