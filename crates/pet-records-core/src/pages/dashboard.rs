use serde::Serialize;

use crate::app::App;
use crate::models::{DashboardStats, MedicalRecord, Pet};

use super::PageResult;

/// Number of visits shown in the recent-visits panel.
pub const RECENT_VISITS: usize = 5;

/// Everything the dashboard shows.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardPage {
    pub username: String,
    pub stats: DashboardStats,
    pub pets: Vec<Pet>,
    /// The last few visits in stored order, newest first.
    pub recent_visits: Vec<MedicalRecord>,
}

impl DashboardPage {
    pub async fn load(app: &App) -> PageResult<Self> {
        let username = app.session.require_auth()?;
        let stats = app.access.get_dashboard_stats().await;
        let pets = app.access.get_pets().await;
        let visits = app.access.get_medical_records().await;

        Ok(Self {
            username,
            stats,
            pets,
            recent_visits: most_recent(visits),
        })
    }
}

fn most_recent(mut visits: Vec<MedicalRecord>) -> Vec<MedicalRecord> {
    let start = visits.len().saturating_sub(RECENT_VISITS);
    let mut recent = visits.split_off(start);
    recent.reverse();
    recent
}
