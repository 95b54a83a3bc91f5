//! Domain enums and chart-ready DTOs shared by the service and the dashboards.

pub mod design_change;
pub mod report;
