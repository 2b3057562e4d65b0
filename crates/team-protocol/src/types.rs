//! Wire types for the team service.
//!
//! Field names follow the service's JSON (`_id`, `userId`, `teamMembers`,
//! camelCase counters). Everything the views display is optional on the
//! wire so that missing values fall back instead of failing the decode.

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{format_usd, MISSING_EMAIL, UNKNOWN_NAME};

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// The `{success, data, message}` envelope every team endpoint returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), message: None }
    }

    /// A successful call that carried no payload.
    pub fn empty() -> Self {
        Self { success: true, data: None, message: None }
    }

    /// An application-level rejection, optionally with a server message.
    pub fn rejected(message: Option<String>) -> Self {
        Self { success: false, data: None, message }
    }
}

// ---------------------------------------------------------------------------
// Hierarchy
// ---------------------------------------------------------------------------

/// The user record a member points at.
///
/// The service sometimes sends the populated record and sometimes only the
/// raw id string; both decode, the latter with no name or email.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A node of the downline tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "userId", default, deserialize_with = "user_ref")]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub direct_count: Option<u64>,
    #[serde(default)]
    pub total_downline: Option<u64>,
    #[serde(default)]
    pub total_earnings: Option<f64>,
    /// Display order; no sort is applied.
    #[serde(rename = "teamMembers", default, deserialize_with = "team_members")]
    pub children: Vec<Member>,
}

impl Member {
    pub fn display_name(&self) -> &str {
        self.user
            .as_ref()
            .and_then(|u| u.name.as_deref())
            .filter(|n| !n.is_empty())
            .unwrap_or(UNKNOWN_NAME)
    }

    pub fn display_email(&self) -> &str {
        self.user
            .as_ref()
            .and_then(|u| u.email.as_deref())
            .filter(|e| !e.is_empty())
            .unwrap_or(MISSING_EMAIL)
    }

    pub fn level(&self) -> u32 {
        self.level.unwrap_or(0)
    }

    pub fn direct_count(&self) -> u64 {
        self.direct_count.unwrap_or(0)
    }

    pub fn total_downline(&self) -> u64 {
        self.total_downline.unwrap_or(0)
    }

    pub fn total_earnings(&self) -> f64 {
        self.total_earnings.unwrap_or(0.0)
    }

    /// Earnings label, present only when earnings are strictly positive.
    pub fn earnings_label(&self) -> Option<String> {
        match self.total_earnings {
            Some(amount) if amount > 0.0 => Some(format_usd(amount)),
            _ => None,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Payload of the downline endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchySnapshot {
    #[serde(default)]
    pub total_members: Option<u64>,
    #[serde(default)]
    pub member: Option<Member>,
}

impl HierarchySnapshot {
    pub fn total_members(&self) -> u64 {
        self.total_members.unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Referral code
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralStats {
    #[serde(default)]
    pub direct_count: Option<u64>,
    #[serde(default)]
    pub total_downline: Option<u64>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub total_earnings: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sponsor {
    #[serde(default)]
    pub name: Option<String>,
}

/// Payload of the referral-code endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralData {
    #[serde(default)]
    pub referral_code: String,
    #[serde(default)]
    pub referral_link: String,
    #[serde(default)]
    pub stats: ReferralStats,
    #[serde(default)]
    pub sponsor: Option<Sponsor>,
}

// ---------------------------------------------------------------------------
// Lenient field decoders
// ---------------------------------------------------------------------------

fn user_ref<'de, D>(deserializer: D) -> Result<Option<UserRef>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum UserField {
        Populated(UserRef),
        Id(String),
    }

    Ok(match Option::<UserField>::deserialize(deserializer)? {
        Some(UserField::Populated(user)) => Some(user),
        Some(UserField::Id(_)) => Some(UserRef::default()),
        None => None,
    })
}

/// `teamMembers`: `null` is an empty list, and an unpopulated child (a bare
/// id string) becomes a member with only its id.
fn team_members<'de, D>(deserializer: D) -> Result<Vec<Member>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ChildField {
        Populated(Member),
        Id(String),
    }

    let children = Option::<Vec<ChildField>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(children
        .into_iter()
        .map(|child| match child {
            ChildField::Populated(member) => member,
            ChildField::Id(id) => Member { id: Some(id), ..Default::default() },
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_decodes_service_field_names() {
        let json = r#"{
            "_id": "m1",
            "userId": {"name": "Alice", "email": "alice@example.com"},
            "level": 2,
            "directCount": 3,
            "totalDownline": 7,
            "totalEarnings": 12.5,
            "teamMembers": [{"_id": "m2", "teamMembers": null}]
        }"#;
        let member: Member = serde_json::from_str(json).unwrap();
        assert_eq!(member.id.as_deref(), Some("m1"));
        assert_eq!(member.display_name(), "Alice");
        assert_eq!(member.display_email(), "alice@example.com");
        assert_eq!(member.level(), 2);
        assert_eq!(member.direct_count(), 3);
        assert_eq!(member.total_downline(), 7);
        assert_eq!(member.earnings_label().as_deref(), Some("$12.50"));
        assert_eq!(member.children.len(), 1);
        assert!(member.children[0].children.is_empty());
    }

    #[test]
    fn unpopulated_user_falls_back() {
        let member: Member = serde_json::from_str(r#"{"_id": "x", "userId": "65f0"}"#).unwrap();
        assert_eq!(member.display_name(), UNKNOWN_NAME);
        assert_eq!(member.display_email(), MISSING_EMAIL);
        assert_eq!(member.direct_count(), 0);
        assert_eq!(member.total_downline(), 0);
        assert!(member.earnings_label().is_none());
    }

    #[test]
    fn unpopulated_children_decode_as_bare_members() {
        let json = r#"{"_id": "root", "userId": "65f0", "teamMembers": ["65f1", {"_id": "65f2"}]}"#;
        let member: Member = serde_json::from_str(json).unwrap();
        assert_eq!(member.children.len(), 2);

        let bare = &member.children[0];
        assert_eq!(bare.id.as_deref(), Some("65f1"));
        assert_eq!(bare.display_name(), UNKNOWN_NAME);
        assert_eq!(bare.display_email(), MISSING_EMAIL);
        assert!(!bare.has_children());
        assert_eq!(member.children[1].id.as_deref(), Some("65f2"));
    }

    #[test]
    fn zero_earnings_have_no_label() {
        let member = Member { total_earnings: Some(0.0), ..Default::default() };
        assert!(member.earnings_label().is_none());
    }

    #[test]
    fn envelope_without_data_decodes() {
        let resp: ApiResponse<ReferralData> =
            serde_json::from_str(r#"{"success": false, "message": "No team"}"#).unwrap();
        assert!(!resp.success);
        assert!(resp.data.is_none());
        assert_eq!(resp.message.as_deref(), Some("No team"));
    }

    #[test]
    fn referral_data_decodes() {
        let json = r#"{
            "referralCode": "REF123",
            "referralLink": "https://example.com/join?ref=REF123",
            "stats": {"directCount": 4, "totalDownline": 9, "level": 1, "totalEarnings": 40},
            "sponsor": {"name": "Bob"}
        }"#;
        let data: ReferralData = serde_json::from_str(json).unwrap();
        assert_eq!(data.referral_code, "REF123");
        assert_eq!(data.stats.level, Some(1));
        assert_eq!(data.sponsor.and_then(|s| s.name).as_deref(), Some("Bob"));
    }
}
