//! Attribution resolver
//!
//! Derives the actor identity (authenticated user id or a durable anonymous
//! id) and campaign metadata for a click event. Pure logic; cookie I/O stays
//! in the handlers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cookie holding the durable anonymous visitor id
pub const ANON_ID_COOKIE: &str = "ref_anon_id";

/// UTM defaults for untracked clicks. An untracked click is not an error;
/// it is attributed to a synthetic source so aggregate reporting always has
/// a value.
pub const DEFAULT_UTM_SOURCE: &str = "organic";
pub const DEFAULT_UTM_MEDIUM: &str = "web";
pub const DEFAULT_UTM_CAMPAIGN: &str = "referral";

/// Campaign query parameters from the triggering URL
#[derive(Debug, Deserialize, Default)]
pub struct UtmQuery {
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    /// Marks the privileged ("my referral") channel
    #[serde(default)]
    pub my_referral: Option<bool>,
}

/// Resolved identity and campaign metadata for one click
#[derive(Debug, Clone, Serialize)]
pub struct Attribution {
    pub user_id: Option<Uuid>,
    pub anonymous_id: Option<String>,
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
    pub is_my_referral: bool,
}

/// Attribution plus a freshly minted anonymous id the handler must persist
/// as a cookie (30-day expiry per config)
#[derive(Debug, Clone)]
pub struct ResolvedAttribution {
    pub attribution: Attribution,
    pub new_anonymous_id: Option<String>,
}

/// Resolve the actor and campaign for a click
///
/// Authenticated identity always wins: when `user_id` is present the
/// anonymous id is omitted entirely. Otherwise the existing cookie value is
/// reused, or a new UUID is minted.
pub fn resolve(
    user_id: Option<Uuid>,
    query: &UtmQuery,
    existing_anonymous_id: Option<&str>,
) -> ResolvedAttribution {
    let (anonymous_id, new_anonymous_id) = if user_id.is_some() {
        (None, None)
    } else {
        match existing_anonymous_id {
            Some(id) if !id.is_empty() => (Some(id.to_string()), None),
            _ => {
                let minted = format!("anon_{}", Uuid::new_v4());
                (Some(minted.clone()), Some(minted))
            }
        }
    };

    let attribution = Attribution {
        user_id,
        anonymous_id,
        utm_source: non_empty_or(&query.utm_source, DEFAULT_UTM_SOURCE),
        utm_medium: non_empty_or(&query.utm_medium, DEFAULT_UTM_MEDIUM),
        utm_campaign: non_empty_or(&query.utm_campaign, DEFAULT_UTM_CAMPAIGN),
        is_my_referral: query.my_referral.unwrap_or(false),
    };

    ResolvedAttribution {
        attribution,
        new_anonymous_id,
    }
}

fn non_empty_or(value: &Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticated_identity_wins() {
        let user_id = Uuid::new_v4();
        let resolved = resolve(Some(user_id), &UtmQuery::default(), Some("anon_abc"));

        assert_eq!(resolved.attribution.user_id, Some(user_id));
        assert!(resolved.attribution.anonymous_id.is_none());
        assert!(resolved.new_anonymous_id.is_none());
    }

    #[test]
    fn test_exactly_one_actor_is_set() {
        let with_user = resolve(Some(Uuid::new_v4()), &UtmQuery::default(), None);
        assert!(with_user.attribution.user_id.is_some());
        assert!(with_user.attribution.anonymous_id.is_none());

        let anonymous = resolve(None, &UtmQuery::default(), None);
        assert!(anonymous.attribution.user_id.is_none());
        assert!(anonymous.attribution.anonymous_id.is_some());
    }

    #[test]
    fn test_existing_anonymous_id_reused() {
        let resolved = resolve(None, &UtmQuery::default(), Some("anon_existing"));

        assert_eq!(
            resolved.attribution.anonymous_id.as_deref(),
            Some("anon_existing")
        );
        // Not newly minted, so nothing to persist
        assert!(resolved.new_anonymous_id.is_none());
    }

    #[test]
    fn test_new_anonymous_id_minted_and_flagged() {
        let resolved = resolve(None, &UtmQuery::default(), None);

        let anon = resolved.attribution.anonymous_id.clone().unwrap();
        assert!(anon.starts_with("anon_"));
        assert_eq!(resolved.new_anonymous_id, Some(anon));
    }

    #[test]
    fn test_utm_defaults_applied() {
        let resolved = resolve(None, &UtmQuery::default(), Some("anon_x"));

        assert_eq!(resolved.attribution.utm_source, "organic");
        assert_eq!(resolved.attribution.utm_medium, "web");
        assert_eq!(resolved.attribution.utm_campaign, "referral");
        assert!(!resolved.attribution.is_my_referral);
    }

    #[test]
    fn test_utm_values_passed_through() {
        let query = UtmQuery {
            utm_source: Some("newsletter".to_string()),
            utm_medium: Some("email".to_string()),
            utm_campaign: Some("diwali".to_string()),
            my_referral: Some(true),
        };
        let resolved = resolve(None, &query, Some("anon_x"));

        assert_eq!(resolved.attribution.utm_source, "newsletter");
        assert_eq!(resolved.attribution.utm_medium, "email");
        assert_eq!(resolved.attribution.utm_campaign, "diwali");
        assert!(resolved.attribution.is_my_referral);
    }

    #[test]
    fn test_empty_utm_values_fall_back() {
        let query = UtmQuery {
            utm_source: Some(String::new()),
            utm_medium: Some("  ".to_string()),
            utm_campaign: None,
            my_referral: None,
        };
        let resolved = resolve(None, &query, Some("anon_x"));

        assert_eq!(resolved.attribution.utm_source, "organic");
        assert_eq!(resolved.attribution.utm_medium, "web");
        assert_eq!(resolved.attribution.utm_campaign, "referral");
    }
}
