//! Team member endpoints.

use serde_json::Value;

use super::ApiClient;
use crate::errors::AppError;
use crate::models::{TeamMember, TeamMemberInput, TeamMemberPatch};

impl ApiClient {
    /// GET /team - List all team members.
    pub async fn list_team_members(&self) -> Result<Vec<TeamMember>, AppError> {
        self.get(&["team"]).await
    }

    /// GET /team/:id - Get a single team member.
    pub async fn get_team_member(&self, id: &str) -> Result<TeamMember, AppError> {
        self.get(&["team", id]).await
    }

    /// POST /team - Create a new team member.
    pub async fn create_team_member(&self, input: &TeamMemberInput) -> Result<TeamMember, AppError> {
        self.post(&["team"], input).await
    }

    /// PUT /team/:id - Update a team member.
    pub async fn update_team_member(
        &self,
        id: &str,
        patch: &TeamMemberPatch,
    ) -> Result<TeamMember, AppError> {
        self.put(&["team", id], patch).await
    }

    /// DELETE /team/:id - Delete a team member.
    pub async fn delete_team_member(&self, id: &str) -> Result<Value, AppError> {
        self.delete(&["team", id]).await
    }
}
