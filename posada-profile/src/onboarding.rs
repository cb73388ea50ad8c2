use crate::models::{
    validate_identity, Profile, ProfileError, BIO_MAX_LEN, DISPLAY_NAME_MAX_LEN,
    FAVOR_TEXT_MAX_LEN, ONBOARDING_COMPLETE,
};
use crate::username::validate_username;
use chrono::{DateTime, Utc};
use posada_shared::{AccommodationType, Intent, PaymentType, Presence};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wizard steps: 0 intent, 1 identity, 2 space, 3 conditions, 4 signup,
/// 5 share. Guests skip the space/conditions steps.
pub const LAST_STEP: i32 = 5;

/// The in-progress onboarding wizard, held server-side under a TTL so it
/// survives the full-page redirect to the auth provider and back.
///
/// Fields fill in step by step, so shape checks run on every save but
/// required fields are only demanded at finalize. A guest never sees the
/// space or conditions steps; their absent answers get defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OnboardingDraft {
    pub draft_id: Uuid,
    pub intent: Option<Intent>,
    pub referral_username: Option<String>,
    pub username: String,
    pub display_name: String,
    pub city: String,
    pub country: String,
    pub accommodation_type: Option<AccommodationType>,
    pub bio: String,
    pub default_payment_type: PaymentType,
    pub default_price: Option<i32>,
    pub default_favor_text: String,
    pub default_presence: Option<Presence>,
    pub current_step: i32,
    pub created_at: DateTime<Utc>,
}

impl OnboardingDraft {
    /// Fresh draft. Arriving through someone's share link pre-selects the
    /// guest intent and remembers whose calendar to return to.
    pub fn new(referral_username: Option<String>) -> Self {
        let intent = referral_username.as_ref().map(|_| Intent::Guest);
        Self {
            draft_id: Uuid::new_v4(),
            intent,
            referral_username,
            username: String::new(),
            display_name: String::new(),
            city: String::new(),
            country: String::new(),
            accommodation_type: None,
            bio: String::new(),
            default_payment_type: PaymentType::Free,
            default_price: None,
            default_favor_text: String::new(),
            default_presence: None,
            current_step: 0,
            created_at: Utc::now(),
        }
    }

    /// Merge a saved step into the draft. Absent fields keep their value.
    pub fn apply(&mut self, update: DraftUpdate) {
        if let Some(intent) = update.intent {
            self.intent = Some(intent);
        }
        if let Some(referral) = update.referral_username {
            self.referral_username = if referral.is_empty() { None } else { Some(referral) };
        }
        if let Some(username) = update.username {
            self.username = username;
        }
        if let Some(display_name) = update.display_name {
            self.display_name = display_name;
        }
        if let Some(city) = update.city {
            self.city = city;
        }
        if let Some(country) = update.country {
            self.country = country;
        }
        if let Some(accommodation_type) = update.accommodation_type {
            self.accommodation_type = Some(accommodation_type);
        }
        if let Some(bio) = update.bio {
            self.bio = bio;
        }
        if let Some(payment_type) = update.default_payment_type {
            self.default_payment_type = payment_type;
        }
        if let Some(price) = update.default_price {
            self.default_price = Some(price);
        }
        if let Some(favor_text) = update.default_favor_text {
            self.default_favor_text = favor_text;
        }
        if let Some(presence) = update.default_presence {
            self.default_presence = Some(presence);
        }
        if let Some(step) = update.current_step {
            self.current_step = step;
        }
    }

    /// Shape checks run on every save. A half-finished draft is fine; what
    /// is present just has to be well-formed.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.current_step < 0 || self.current_step > LAST_STEP {
            return Err(DraftError::StepOutOfRange(self.current_step));
        }
        if !self.username.is_empty() {
            validate_username(&self.username).map_err(ProfileError::from)?;
        }
        if self.display_name.len() > DISPLAY_NAME_MAX_LEN {
            return Err(ProfileError::TooLong {
                field: "display_name",
                max: DISPLAY_NAME_MAX_LEN,
            }
            .into());
        }
        if self.bio.len() > BIO_MAX_LEN {
            return Err(ProfileError::TooLong {
                field: "bio",
                max: BIO_MAX_LEN,
            }
            .into());
        }
        if self.default_favor_text.len() > FAVOR_TEXT_MAX_LEN {
            return Err(ProfileError::TooLong {
                field: "default_favor_text",
                max: FAVOR_TEXT_MAX_LEN,
            }
            .into());
        }
        if let Some(price) = self.default_price {
            if price < 0 {
                return Err(ProfileError::NegativePrice.into());
            }
        }
        Ok(())
    }

    /// Everything a profile cannot exist without: a chosen intent and the
    /// full identity step.
    pub fn validate_for_finalize(&self) -> Result<(), DraftError> {
        self.validate()?;
        if self.intent.is_none() {
            return Err(DraftError::MissingIntent);
        }
        validate_identity(&self.username, &self.display_name, &self.city, &self.country)?;
        Ok(())
    }

    /// Materialize the profile this draft describes, owned by the account
    /// that just authenticated. Skipped answers fall back to defaults: a
    /// guest who never saw the space step gets a plain room listing.
    pub fn finalized_profile(&self, account_id: Uuid) -> Result<Profile, DraftError> {
        self.validate_for_finalize()?;

        Ok(Profile {
            id: account_id,
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
            accommodation_type: self.accommodation_type.unwrap_or(AccommodationType::Room),
            bio: if self.bio.is_empty() { None } else { Some(self.bio.clone()) },
            avatar_url: None,
            intent: self.intent,
            default_payment_type: Some(self.default_payment_type),
            default_price: self.default_price,
            default_favor_text: if self.default_favor_text.is_empty() {
                None
            } else {
                Some(self.default_favor_text.clone())
            },
            default_presence: self.default_presence,
            onboarding_step: ONBOARDING_COMPLETE,
            created_at: Utc::now(),
        })
    }
}

/// One saved step of the wizard. Everything is optional; the client sends
/// whatever the step it just completed collected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraftUpdate {
    pub intent: Option<Intent>,
    pub referral_username: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub accommodation_type: Option<AccommodationType>,
    pub bio: Option<String>,
    pub default_payment_type: Option<PaymentType>,
    pub default_price: Option<i32>,
    pub default_favor_text: Option<String>,
    pub default_presence: Option<Presence>,
    pub current_step: Option<i32>,
}

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("Choose whether you want to host or travel first")]
    MissingIntent,

    #[error("Unknown wizard step {0}")]
    StepOutOfRange(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_draft_starts_at_intent_step() {
        let draft = OnboardingDraft::new(None);

        assert_eq!(draft.current_step, 0);
        assert_eq!(draft.intent, None);
        assert_eq!(draft.default_payment_type, PaymentType::Free);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_referral_preselects_guest_intent() {
        let draft = OnboardingDraft::new(Some("ana".to_string()));

        assert_eq!(draft.intent, Some(Intent::Guest));
        assert_eq!(draft.referral_username.as_deref(), Some("ana"));
    }

    #[test]
    fn test_apply_merges_step_fields() {
        let mut draft = OnboardingDraft::new(None);

        draft.apply(DraftUpdate {
            intent: Some(Intent::Host),
            current_step: Some(1),
            ..Default::default()
        });
        draft.apply(DraftUpdate {
            username: Some("ana_23".to_string()),
            display_name: Some("Ana".to_string()),
            city: Some("Madrid".to_string()),
            country: Some("Spain".to_string()),
            current_step: Some(2),
            ..Default::default()
        });

        assert_eq!(draft.intent, Some(Intent::Host));
        assert_eq!(draft.username, "ana_23");
        assert_eq!(draft.current_step, 2);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_validate_checks_shape_not_presence() {
        // Empty identity fields are fine mid-wizard
        let draft = OnboardingDraft::new(None);
        assert!(draft.validate().is_ok());

        let mut bad_step = OnboardingDraft::new(None);
        bad_step.current_step = 7;
        assert!(matches!(bad_step.validate(), Err(DraftError::StepOutOfRange(7))));

        let mut bad_username = OnboardingDraft::new(None);
        bad_username.username = "Ana!".to_string();
        assert!(bad_username.validate().is_err());

        let mut long_bio = OnboardingDraft::new(None);
        long_bio.bio = "x".repeat(BIO_MAX_LEN + 1);
        assert!(long_bio.validate().is_err());

        let mut negative = OnboardingDraft::new(None);
        negative.default_price = Some(-1);
        assert!(negative.validate().is_err());
    }

    fn host_draft() -> OnboardingDraft {
        let mut draft = OnboardingDraft::new(None);
        draft.apply(DraftUpdate {
            intent: Some(Intent::Host),
            username: Some("casa-de-ana".to_string()),
            display_name: Some("Ana".to_string()),
            city: Some("Madrid".to_string()),
            country: Some("Spain".to_string()),
            accommodation_type: Some(AccommodationType::Sofa),
            bio: Some("Plants everywhere.".to_string()),
            default_payment_type: Some(PaymentType::FriendPrice),
            default_price: Some(15),
            default_presence: Some(Presence::Home),
            current_step: Some(4),
            ..Default::default()
        });
        draft
    }

    #[test]
    fn test_finalize_requires_intent_and_identity() {
        let empty = OnboardingDraft::new(None);
        assert!(matches!(
            empty.validate_for_finalize(),
            Err(DraftError::MissingIntent)
        ));

        let mut no_city = host_draft();
        no_city.city = String::new();
        assert!(no_city.validate_for_finalize().is_err());

        assert!(host_draft().validate_for_finalize().is_ok());
    }

    #[test]
    fn test_finalized_profile_carries_the_draft_over() {
        let account_id = Uuid::new_v4();
        let profile = host_draft().finalized_profile(account_id).unwrap();

        assert_eq!(profile.id, account_id);
        assert_eq!(profile.username, "casa-de-ana");
        assert_eq!(profile.accommodation_type, AccommodationType::Sofa);
        assert_eq!(profile.bio.as_deref(), Some("Plants everywhere."));
        assert_eq!(profile.default_payment_type, Some(PaymentType::FriendPrice));
        assert_eq!(profile.default_price, Some(15));
        assert_eq!(profile.onboarding_step, ONBOARDING_COMPLETE);
    }

    #[test]
    fn test_guest_draft_finalizes_with_defaults() {
        // A guest never reaches the space or conditions steps
        let mut draft = OnboardingDraft::new(Some("ana".to_string()));
        draft.apply(DraftUpdate {
            username: Some("leo".to_string()),
            display_name: Some("Leo".to_string()),
            city: Some("Berlin".to_string()),
            country: Some("Germany".to_string()),
            current_step: Some(2),
            ..Default::default()
        });

        let profile = draft.finalized_profile(Uuid::new_v4()).unwrap();
        assert_eq!(profile.intent, Some(Intent::Guest));
        assert_eq!(profile.accommodation_type, AccommodationType::Room);
        assert_eq!(profile.bio, None);
        assert_eq!(profile.default_favor_text, None);
    }
}
