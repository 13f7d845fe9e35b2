use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{MemberStatus, TeamMember};

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateMemberRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub department: String,
    pub status: Option<MemberStatus>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub status: Option<MemberStatus>,
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MemberList {
    pub items: Vec<TeamMember>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignOrderRequest {
    pub member_id: String,
}
