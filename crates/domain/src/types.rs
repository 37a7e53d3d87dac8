//! Common data types used throughout the application

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::ACCESS_TOKEN_EXPIRY_MARGIN_SECS;
use crate::errors::LeadForgeError;

/// The OAuth credential pair for the CRM connection.
///
/// One logical instance exists per deployment. The record is mutated on
/// every refresh and only ever cleared by explicit operator action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Short-lived token attached to CRM calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Long-lived token used to obtain new access tokens silently.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Absolute expiry of the access token (UTC). Absence is treated as
    /// "never expires".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token_expires_at: Option<DateTime<Utc>>,
}

impl CredentialRecord {
    /// True when no credential fields are set at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none()
            && self.refresh_token.is_none()
            && self.access_token_expires_at.is_none()
    }

    /// Check access-token validity at an explicit point in time.
    ///
    /// The token counts as valid only while `now` is more than the safety
    /// margin before the recorded expiry. No recorded expiry means valid.
    #[must_use]
    pub fn is_access_token_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.access_token.is_none() {
            return false;
        }
        match self.access_token_expires_at {
            Some(expires_at) => now + Duration::seconds(ACCESS_TOKEN_EXPIRY_MARGIN_SECS) < expires_at,
            None => true,
        }
    }

    /// Check access-token validity against the current wall clock.
    #[must_use]
    pub fn is_access_token_valid(&self) -> bool {
        self.is_access_token_valid_at(Utc::now())
    }

    /// Apply a partial update, preserving every field the update omits.
    ///
    /// This is what keeps the refresh token alive across access-token-only
    /// refreshes.
    pub fn merge(&mut self, update: CredentialUpdate) {
        if let Some(access_token) = update.access_token {
            self.access_token = Some(access_token);
        }
        if let Some(refresh_token) = update.refresh_token {
            self.refresh_token = Some(refresh_token);
        }
        if let Some(expires_at) = update.access_token_expires_at {
            self.access_token_expires_at = Some(expires_at);
        }
    }

    /// Return a copy with the update applied.
    #[must_use]
    pub fn merged(&self, update: CredentialUpdate) -> Self {
        let mut merged = self.clone();
        merged.merge(update);
        merged
    }
}

/// Partial update for a [`CredentialRecord`]. `None` fields are preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialUpdate {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub access_token_expires_at: Option<DateTime<Utc>>,
}

impl CredentialUpdate {
    /// Update carrying a new access token and its expiry only.
    ///
    /// Used on every silent refresh: the stored refresh token must survive.
    #[must_use]
    pub fn access_only(access_token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { access_token: Some(access_token), refresh_token: None, access_token_expires_at: expires_at }
    }

    /// Update carrying the full grant from an authorization-code exchange.
    #[must_use]
    pub fn full_grant(
        access_token: String,
        refresh_token: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self { access_token: Some(access_token), refresh_token, access_token_expires_at: expires_at }
    }
}

/// Where a lead was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeadSource {
    Form,
    ChatAgent,
}

impl LeadSource {
    /// The enumerated "Lead Source" value the CRM expects.
    #[must_use]
    pub fn crm_label(&self) -> &'static str {
        match self {
            Self::Form => "Website Form",
            Self::ChatAgent => "Website Chat",
        }
    }
}

impl Default for LeadSource {
    fn default() -> Self {
        Self::Form
    }
}

impl fmt::Display for LeadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Form => write!(f, "form"),
            Self::ChatAgent => write!(f, "chat-agent"),
        }
    }
}

impl FromStr for LeadSource {
    type Err = LeadForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "form" => Ok(Self::Form),
            "chat-agent" => Ok(Self::ChatAgent),
            other => Err(LeadForgeError::Validation(format!("unknown lead source: {other}"))),
        }
    }
}

/// Raw lead input as captured from a form or chat widget.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadInput {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default)]
    pub lead_source: LeadSource,
}

impl LeadInput {
    /// Validate required fields.
    ///
    /// # Errors
    /// Returns `LeadForgeError::Validation` when name, email, or message is
    /// missing or blank.
    pub fn validate(&self) -> crate::errors::Result<()> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if self.message.trim().is_empty() {
            missing.push("message");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(LeadForgeError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// A captured prospective-customer inquiry and its delivery state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: String,
    pub source: LeadSource,
    pub product_name: Option<String>,
    pub created_at: DateTime<Utc>,
    /// A lead transitions pending -> sent exactly once.
    pub sent: bool,
    pub external_lead_id: Option<String>,
    pub external_contact_id: Option<String>,
}

impl Lead {
    /// Build a new pending lead from validated input.
    #[must_use]
    pub fn from_input(input: LeadInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            company: input.company,
            message: input.message,
            source: input.lead_source,
            product_name: input.product_name,
            created_at: Utc::now(),
            sent: false,
            external_lead_id: None,
            external_contact_id: None,
        }
    }
}

/// Aggregate lead counts for observability.
///
/// Always derived from stored rows, never a separately maintained counter,
/// so `pending + sent == total` holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadStats {
    pub total: u64,
    pub pending: u64,
    pub sent: u64,
}
