//! Shared test helpers: an in-memory backend and canned pipelines

use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use deal_board::api::{DealsApi, StagesApi};
use deal_board::error::ApiError;
use deal_board::models::{Deal, DealUpdate, Stage};

pub const WAIT: Duration = Duration::from_secs(5);
pub const OWNER: &str = "agent@example.com";

#[derive(Default)]
struct FakeState {
    stages: Vec<Stage>,
    deals: Vec<Deal>,
    reject_updates: Option<u16>,
    fail_lists: Option<u16>,
    updates: Vec<(String, DealUpdate)>,
    list_calls: usize,
}

/// Deals/stages backend held in memory.
///
/// Accepted updates are applied to the stored deals so a following refresh
/// sees them.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
    paused: Mutex<bool>,
    resume: Condvar,
}

impl FakeBackend {
    pub fn new(stages: Vec<Stage>, deals: Vec<Deal>) -> Arc<Self> {
        let backend = Self::default();
        {
            let mut state = backend.state.lock().unwrap();
            state.stages = stages;
            state.deals = deals;
        }
        Arc::new(backend)
    }

    /// Answer every update with `status` until cleared with `None`.
    pub fn reject_updates(&self, status: Option<u16>) {
        self.state.lock().unwrap().reject_updates = status;
    }

    /// Answer every list call with `status` until cleared with `None`.
    pub fn fail_lists(&self, status: Option<u16>) {
        self.state.lock().unwrap().fail_lists = status;
    }

    /// Hold update calls until [`FakeBackend::resume_updates`].
    pub fn pause_updates(&self) {
        *self.paused.lock().unwrap() = true;
    }

    pub fn resume_updates(&self) {
        *self.paused.lock().unwrap() = false;
        self.resume.notify_all();
    }

    pub fn updates(&self) -> Vec<(String, DealUpdate)> {
        self.state.lock().unwrap().updates.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    /// Change a stored deal behind the board's back.
    pub fn set_stage(&self, deal_id: &str, stage_id: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(deal) = state.deals.iter_mut().find(|d| d.id == deal_id) {
            deal.stage = Some(stage_id.to_string());
        }
    }

    fn wait_while_paused(&self) {
        let paused = self.paused.lock().unwrap();
        let _guard = self.resume.wait_while(paused, |p| *p).unwrap();
    }
}

impl DealsApi for FakeBackend {
    fn list_deals(&self, _owner: &str) -> Result<Vec<Deal>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        if let Some(status) = state.fail_lists {
            return Err(ApiError::Status {
                context: "Failed to fetch deals".to_string(),
                status,
            });
        }
        Ok(state.deals.clone())
    }

    fn update_deal(&self, deal_id: &str, update: &DealUpdate) -> Result<(), ApiError> {
        self.wait_while_paused();

        let mut state = self.state.lock().unwrap();
        state.updates.push((deal_id.to_string(), update.clone()));
        if let Some(status) = state.reject_updates {
            return Err(ApiError::Status {
                context: "Failed to update deal".to_string(),
                status,
            });
        }
        if let Some(deal) = state.deals.iter_mut().find(|d| d.id == deal_id) {
            deal.stage = Some(update.stage.clone());
        }
        Ok(())
    }
}

impl StagesApi for FakeBackend {
    fn list_stages(&self, _owner: &str) -> Result<Vec<Stage>, ApiError> {
        let state = self.state.lock().unwrap();
        if let Some(status) = state.fail_lists {
            return Err(ApiError::Status {
                context: "Failed to fetch stages".to_string(),
                status,
            });
        }
        Ok(state.stages.clone())
    }
}

/// Buyer pipeline `new -> contract -> closed`, listed out of order.
pub fn buyer_stages() -> Vec<Stage> {
    vec![
        Stage::new("closed", "Closed", 3),
        Stage::new("new", "New", 1),
        Stage::new("contract", "Under Contract", 2),
    ]
}

pub fn sample_deals() -> Vec<Deal> {
    vec![
        Deal::new("d1", "12 Oak St", Some("new")).with_price(450_000.0),
        Deal::new("d2", "9 Elm Ave", Some("new")).with_price(300_000.0),
        Deal::new("d3", "4 Pine Rd", Some("contract")).with_price(725_000.0),
    ]
}

pub fn stage_of<'a>(deals: &'a [Deal], deal_id: &str) -> Option<&'a str> {
    deals
        .iter()
        .find(|d| d.id == deal_id)
        .and_then(|d| d.stage.as_deref())
}
