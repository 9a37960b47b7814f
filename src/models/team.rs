//! Team member model matching the backend `/team` resource.

use serde::{Deserialize, Serialize};

use crate::errors::FieldErrors;

/// Section of the team page a member is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TeamCategory {
    Mentor,
    ExecutiveCommittee,
}

impl TeamCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamCategory::Mentor => "mentor",
            TeamCategory::ExecutiveCommittee => "executiveCommittee",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mentor" => Some(TeamCategory::Mentor),
            "executiveCommittee" => Some(TeamCategory::ExecutiveCommittee),
            _ => None,
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            TeamCategory::Mentor => "Mentors",
            TeamCategory::ExecutiveCommittee => "Executive Committee",
        }
    }
}

/// Optional contact links shown on a member card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

impl SocialLinks {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.linkedin.is_none()
            && self.github.is_none()
            && self.twitter.is_none()
    }
}

/// A mentor or executive committee member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Free-text title, e.g. "Faculty Advisor"
    pub role: String,
    pub category: TeamCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<SocialLinks>,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Request body for `POST /team`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberInput {
    pub name: String,
    pub role: String,
    pub category: TeamCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<SocialLinks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl TeamMemberInput {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.push("name", "Name is required");
        }
        if self.role.trim().is_empty() {
            errors.push("role", "Role is required");
        }
        errors
    }
}

impl From<&TeamMember> for TeamMemberInput {
    fn from(member: &TeamMember) -> Self {
        Self {
            name: member.name.clone(),
            role: member.role.clone(),
            category: member.category,
            image: member.image.clone(),
            bio: member.bio.clone(),
            social: member.social.clone(),
            order: Some(member.order),
            is_active: Some(member.is_active),
        }
    }
}

/// Request body for `PUT /team/{id}`; absent fields are left unchanged.
///
/// `image`, `bio` and `social` set to `Some(None)` are sent as `null`, clearing them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TeamCategory>,
    #[serde(
        default,
        deserialize_with = "super::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "super::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub bio: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "super::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub social: Option<Option<SocialLinks>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl From<TeamMemberInput> for TeamMemberPatch {
    fn from(input: TeamMemberInput) -> Self {
        Self {
            name: Some(input.name),
            role: Some(input.role),
            category: Some(input.category),
            image: Some(input.image.filter(|s| !s.trim().is_empty())),
            bio: Some(input.bio.filter(|s| !s.trim().is_empty())),
            social: Some(input.social),
            order: input.order,
            is_active: input.is_active,
        }
    }
}

/// Team page layout: active members split by category, each list sorted by `order`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    pub mentors: Vec<TeamMember>,
    pub executive_committee: Vec<TeamMember>,
}

impl Roster {
    pub fn from_members(members: &[TeamMember]) -> Self {
        let mut roster = Roster::default();
        for member in members.iter().filter(|m| m.is_active) {
            match member.category {
                TeamCategory::Mentor => roster.mentors.push(member.clone()),
                TeamCategory::ExecutiveCommittee => {
                    roster.executive_committee.push(member.clone())
                }
            }
        }
        // Stable sort keeps server order for equal keys
        roster.mentors.sort_by_key(|m| m.order);
        roster.executive_committee.sort_by_key(|m| m.order);
        roster
    }

    pub fn sections(&self) -> [(TeamCategory, &[TeamMember]); 2] {
        [
            (TeamCategory::Mentor, self.mentors.as_slice()),
            (TeamCategory::ExecutiveCommittee, self.executive_committee.as_slice()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn member(id: &str, category: TeamCategory, order: i32, is_active: bool) -> TeamMember {
        TeamMember {
            id: id.to_string(),
            name: format!("Member {}", id),
            role: "Lead".to_string(),
            category,
            image: None,
            bio: None,
            social: None,
            order,
            is_active,
        }
    }

    #[test]
    fn test_team_member_wire_format() {
        let member: TeamMember = serde_json::from_value(json!({
            "_id": "t1",
            "name": "Dr. Meera Iyer",
            "role": "Faculty Advisor",
            "category": "executiveCommittee",
            "social": { "github": "https://github.com/meera" }
        }))
        .unwrap();

        assert_eq!(member.category, TeamCategory::ExecutiveCommittee);
        assert!(member.is_active);
        assert_eq!(member.order, 0);
        assert_eq!(
            member.social.as_ref().and_then(|s| s.github.as_deref()),
            Some("https://github.com/meera")
        );

        let value = serde_json::to_value(&member).unwrap();
        assert_eq!(value["isActive"], true);
        assert_eq!(value["social"], json!({ "github": "https://github.com/meera" }));
    }

    #[test]
    fn test_roster_groups_and_sorts_active_members() {
        let members = vec![
            member("a", TeamCategory::Mentor, 2, true),
            member("b", TeamCategory::ExecutiveCommittee, 1, true),
            member("c", TeamCategory::Mentor, 1, true),
            member("d", TeamCategory::Mentor, 0, false),
            member("e", TeamCategory::ExecutiveCommittee, 0, true),
        ];

        let roster = Roster::from_members(&members);
        let ids = |list: &[TeamMember]| list.iter().map(|m| m.id.clone()).collect::<Vec<_>>();

        assert_eq!(ids(&roster.mentors), vec!["c", "a"]);
        assert_eq!(ids(&roster.executive_committee), vec!["e", "b"]);
    }

    #[test]
    fn test_input_validation() {
        let input = TeamMemberInput {
            name: " ".into(),
            role: "".into(),
            category: TeamCategory::Mentor,
            image: None,
            bio: None,
            social: None,
            order: None,
            is_active: None,
        };
        let errors = input.validate();
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("role"), Some("Role is required"));

        let body = serde_json::to_value(&input).unwrap();
        assert!(body.get("order").is_none());
        assert_eq!(body["category"], "mentor");
    }

    #[test]
    fn test_patch_clears_blank_optional_fields() {
        let input = TeamMemberInput {
            name: "Meera Iyer".into(),
            role: "Faculty Mentor".into(),
            category: TeamCategory::Mentor,
            image: Some("  ".into()),
            bio: None,
            social: None,
            order: Some(1),
            is_active: None,
        };

        let value = serde_json::to_value(TeamMemberPatch::from(input)).unwrap();
        let body = value.as_object().unwrap();
        for key in ["image", "bio", "social"] {
            assert_eq!(body.get(key), Some(&serde_json::Value::Null), "{key}");
        }
        assert!(body.get("isActive").is_none());
    }
}
