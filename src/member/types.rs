use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::MemberModel;

#[derive(Debug, Deserialize)]
pub struct MemberListQuery {
    pub gym_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MemberResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<MemberModel> for MemberResponse {
    fn from(member: MemberModel) -> Self {
        Self {
            id: member.id,
            name: member.name,
            email: member.email,
            role: member.role,
        }
    }
}
