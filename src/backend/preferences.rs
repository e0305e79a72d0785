//! Per-user preferences stored in the `user_preferences` table.

use chrono::{DateTime, Utc};
use newsdesk_search::types::null_as_default;
use serde::{Deserialize, Serialize};

use super::BackendClient;
use crate::error::{DeskError, Result};
use crate::session::User;

/// Table holding one preferences row per user.
pub const PREFERENCES_TABLE: &str = "user_preferences";

/// Notification switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub email_enabled: bool,
    pub daily_digest: bool,
    pub breaking_news: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_enabled: true,
            daily_digest: true,
            breaking_news: false,
        }
    }
}

/// Which platforms the user drafts for by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformPriorities {
    pub instagram: bool,
    pub linkedin: bool,
    pub x: bool,
}

impl Default for PlatformPriorities {
    fn default() -> Self {
        Self {
            instagram: true,
            linkedin: true,
            x: true,
        }
    }
}

/// A user's preferences row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Owner.
    pub user_id: String,
    /// Digest address.
    #[serde(default)]
    pub email: String,
    /// Daily digest time, `HH:MM:SS`.
    #[serde(default = "default_schedule")]
    pub schedule_time: String,
    /// Missing or null in the row means defaults.
    #[serde(default, deserialize_with = "null_as_default")]
    pub notification_settings: NotificationSettings,
    /// Missing or null in the row means defaults.
    #[serde(default, deserialize_with = "null_as_default")]
    pub platform_priorities: PlatformPriorities,
    /// Whether the digest is active.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Last save time, set by [`PreferencesService::save`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_schedule() -> String {
    "09:00:00".into()
}

fn default_active() -> bool {
    true
}

impl UserPreferences {
    /// Defaults for `user`.
    pub fn defaults_for(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            email: user.email.clone().unwrap_or_default(),
            schedule_time: default_schedule(),
            notification_settings: NotificationSettings::default(),
            platform_priorities: PlatformPriorities::default(),
            is_active: true,
            updated_at: None,
        }
    }
}

/// Client for the preferences table.
#[derive(Debug, Clone)]
pub struct PreferencesService {
    client: BackendClient,
}

impl PreferencesService {
    /// Service over `client`.
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Load `user`'s preferences, or defaults when no row exists.
    ///
    /// # Errors
    ///
    /// Any error from the REST call.
    pub async fn load(&self, user: &User) -> Result<UserPreferences> {
        let filter = format!("eq.{}", user.id);
        let rows: Vec<UserPreferences> = self
            .client
            .select(
                PREFERENCES_TABLE,
                &[("select", "*"), ("user_id", filter.as_str()), ("limit", "1")],
            )
            .await?;
        Ok(rows
            .into_iter()
            .next()
            .unwrap_or_else(|| UserPreferences::defaults_for(user)))
    }

    /// Upsert `prefs`, stamping `updated_at`.
    ///
    /// # Errors
    ///
    /// [`DeskError::Auth`] if `prefs` belong to someone other than the
    /// signed-in user, otherwise any error from the REST call.
    pub async fn save(&self, prefs: &UserPreferences) -> Result<UserPreferences> {
        if let Some(user) = self.client.session().user() {
            if user.id != prefs.user_id {
                return Err(DeskError::Auth(
                    "cannot save preferences for another user".into(),
                ));
            }
        }
        let mut row = prefs.clone();
        row.updated_at = Some(Utc::now());
        self.client.upsert(PREFERENCES_TABLE, &row, "user_id").await?;
        tracing::info!(user = %row.user_id, "preferences saved");
        Ok(row)
    }
}
