//! Team management screen: a local copy of the roster plus create, update and delete.

use crate::api::ApiClient;
use crate::errors::AppError;
use crate::models::{Roster, TeamMember, TeamMemberInput};

/// Admin view over `/team` holding its own copy of the member list.
pub struct TeamManager {
    api: ApiClient,
    members: Vec<TeamMember>,
}

impl TeamManager {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            members: Vec::new(),
        }
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    /// Public team page layout built from the local copy.
    pub fn roster(&self) -> Roster {
        Roster::from_members(&self.members)
    }

    /// Re-fetch the list from the backend.
    pub async fn refresh(&mut self) -> Result<&[TeamMember], AppError> {
        match self.api.list_team_members().await {
            Ok(members) => {
                tracing::debug!("Fetched {} team members", members.len());
                self.members = members;
                Ok(&self.members)
            }
            Err(e) => {
                tracing::error!("Failed to fetch team members: {}", e);
                Err(e)
            }
        }
    }

    /// Create a member, or update `editing_id` when given, then refresh the list.
    pub async fn save(
        &mut self,
        editing_id: Option<&str>,
        input: &TeamMemberInput,
    ) -> Result<TeamMember, AppError> {
        input.validate().into_result()?;

        let result = match editing_id {
            Some(id) => {
                self.api
                    .update_team_member(id, &input.clone().into())
                    .await
            }
            None => self.api.create_team_member(input).await,
        };

        let saved =
            result.inspect_err(|e| tracing::error!("Failed to save team member: {}", e))?;
        tracing::info!("Saved team member {} ({})", saved.name, saved.id);

        let _ = self.refresh().await;
        Ok(saved)
    }

    /// Delete a member, then refresh the list.
    pub async fn delete(&mut self, id: &str) -> Result<(), AppError> {
        self.api
            .delete_team_member(id)
            .await
            .inspect_err(|e| tracing::error!("Failed to delete team member: {}", e))?;
        tracing::info!("Deleted team member {}", id);

        let _ = self.refresh().await;
        Ok(())
    }
}
