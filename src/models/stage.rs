use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which side of a transaction a pipeline serves.
///
/// Buyer and seller pipelines have disjoint stage sets; the board shows one
/// of them at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    #[default]
    Buyer,
    Seller,
}

impl ClientType {
    /// The other pipeline view.
    pub fn toggled(self) -> Self {
        match self {
            ClientType::Buyer => ClientType::Seller,
            ClientType::Seller => ClientType::Buyer,
        }
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientType::Buyer => write!(f, "buyer"),
            ClientType::Seller => write!(f, "seller"),
        }
    }
}

impl FromStr for ClientType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buyer" => Ok(ClientType::Buyer),
            "seller" => Ok(ClientType::Seller),
            other => Err(format!(
                "Unknown client type: {other}. Expected buyer or seller"
            )),
        }
    }
}

/// A column of the deal pipeline.
///
/// Stages are created and edited elsewhere; the board only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: String,
    pub name: String,
    /// Left-to-right position of the column.
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub client_type: ClientType,
}

impl Stage {
    pub fn new(id: impl Into<String>, name: impl Into<String>, order: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            order,
            client_type: ClientType::default(),
        }
    }

    pub fn with_client_type(mut self, client_type: ClientType) -> Self {
        self.client_type = client_type;
        self
    }

    /// Column ordering: ascending order index, ties broken by identifier.
    pub fn column_cmp(&self, other: &Stage) -> Ordering {
        self.order
            .cmp(&other.order)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Sort stages into display order.
pub fn sort_stages(stages: &mut [Stage]) {
    stages.sort_by(Stage::column_cmp);
}
