use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::serialization::{blank_as_none, date_or_empty, lenient_number, optional_date};

/// A prospective transaction tracked in the pipeline.
///
/// Every descriptive field other than the title is optional. Absence stays
/// `None` here; defaults are only applied when building a [`DealUpdate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: String,
    /// Stage the deal sits in. `None` keeps the deal off the board.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub stage: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub contact: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    #[serde(default, with = "optional_date")]
    pub closing_date: Option<NaiveDate>,
    #[serde(default, with = "optional_date")]
    pub inspection_date: Option<NaiveDate>,
    #[serde(default, with = "optional_date")]
    pub appraisal_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub commission: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub commission_split: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub property_address: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub property_city: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub property_state: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub property_zip: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub owner: Option<String>,
}

impl Deal {
    /// Create a deal with only an id, title and stage set.
    pub fn new(id: impl Into<String>, title: impl Into<String>, stage: Option<&str>) -> Self {
        Self {
            id: id.into(),
            stage: stage.map(str::to_string),
            title: title.into(),
            contact: None,
            price: None,
            closing_date: None,
            inspection_date: None,
            appraisal_date: None,
            commission: None,
            commission_split: None,
            property_address: None,
            property_city: None,
            property_state: None,
            property_zip: None,
            description: None,
            owner: None,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn in_stage(&self, stage_id: &str) -> bool {
        self.stage.as_deref() == Some(stage_id)
    }

    /// Label used on cards and in notices; falls back to the id for
    /// untitled deals.
    pub fn label(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.id
        } else {
            &self.title
        }
    }

    /// One-line property address, if any part of it is known.
    pub fn address_line(&self) -> Option<String> {
        let parts: Vec<&str> = [
            self.property_address.as_deref(),
            self.property_city.as_deref(),
            self.property_state.as_deref(),
            self.property_zip.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    /// Build the full-record update that moves this deal to `stage_id`.
    ///
    /// The persist endpoint replaces the whole record, so every field is
    /// carried over unchanged with only the stage substituted.
    pub fn to_update(&self, stage_id: &str) -> DealUpdate {
        DealUpdate {
            title: self.title.clone(),
            contact: self.contact.clone(),
            price: self.price,
            stage: stage_id.to_string(),
            closing_date: date_or_empty(self.closing_date),
            inspection_date: date_or_empty(self.inspection_date),
            appraisal_date: date_or_empty(self.appraisal_date),
            commission: self.commission.unwrap_or(0.0),
            commission_split: self.commission_split.unwrap_or(0.0),
            property_address: self.property_address.clone().unwrap_or_default(),
            property_city: self.property_city.clone().unwrap_or_default(),
            property_state: self.property_state.clone().unwrap_or_default(),
            property_zip: self.property_zip.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
        }
    }
}

/// Body of the persist-deal call.
///
/// Dates are `""` when absent, commission values `0`, and address and
/// description strings `""`. Title, contact and price go through verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealUpdate {
    pub title: String,
    pub contact: Option<String>,
    pub price: Option<f64>,
    pub stage: String,
    pub closing_date: String,
    pub inspection_date: String,
    pub appraisal_date: String,
    pub commission: f64,
    pub commission_split: f64,
    pub property_address: String,
    pub property_city: String,
    pub property_state: String,
    pub property_zip: String,
    pub description: String,
}
