pub mod dashboard;
pub mod donut;
pub mod sidebar;
