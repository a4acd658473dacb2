use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::GymModel;

#[derive(Debug, Deserialize)]
pub struct GymSearchQuery {
    pub query: Option<String>,
}

/// Entry in the gym search listing
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct GymSummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GymListResponse {
    pub gyms: Vec<GymSummary>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct GymDetailResponse {
    pub id: Uuid,
    pub name: String,
    pub member_code: String,
}

impl From<GymModel> for GymSummary {
    fn from(gym: GymModel) -> Self {
        Self {
            id: gym.id,
            name: gym.name,
        }
    }
}

impl From<GymModel> for GymDetailResponse {
    fn from(gym: GymModel) -> Self {
        Self {
            id: gym.id,
            name: gym.name,
            member_code: gym.member_code,
        }
    }
}
