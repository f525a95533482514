// Library root for the dashboard core: data loading, ranking, selection,
// chart and profile derivation, and the tab orchestrator.

pub mod catalog;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod profile;
pub mod ranking;
pub mod selection;
