use crate::username::{validate_username, UsernameError};
use chrono::{DateTime, Utc};
use posada_shared::{AccommodationType, Intent, PaymentType, Presence, StayTerms};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DISPLAY_NAME_MAX_LEN: usize = 50;
pub const BIO_MAX_LEN: usize = 300;
pub const FAVOR_TEXT_MAX_LEN: usize = 300;

/// Wizard step value stored once onboarding has finished.
pub const ONBOARDING_COMPLETE: i32 = 99;

/// One account's public face: identity, the space they offer, and the
/// default conditions applied to new availability entries.
///
/// The username never changes after creation; it doubles as the public
/// profile URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub city: String,
    pub country: String,
    pub accommodation_type: AccommodationType,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub intent: Option<Intent>,
    pub default_payment_type: Option<PaymentType>,
    pub default_price: Option<i32>,
    pub default_favor_text: Option<String>,
    pub default_presence: Option<Presence>,
    pub onboarding_step: i32,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// The profile's default conditions as stay terms, used to pre-fill an
    /// availability entry published without explicit terms.
    pub fn default_stay_terms(&self, currency: &str) -> StayTerms {
        StayTerms {
            accommodation_status: self.default_presence.map(|p| p.as_accommodation_status()),
            payment_type: self.default_payment_type,
            price_amount: self.default_price,
            price_currency: currency.to_string(),
            favor_description: self.default_favor_text.clone(),
        }
    }

    /// Apply an owner edit. The username and id are not touchable here.
    pub fn apply(&mut self, changes: ProfileChanges) {
        if let Some(display_name) = changes.display_name {
            self.display_name = display_name;
        }
        if let Some(city) = changes.city {
            self.city = city;
        }
        if let Some(country) = changes.country {
            self.country = country;
        }
        if let Some(accommodation_type) = changes.accommodation_type {
            self.accommodation_type = accommodation_type;
        }
        if let Some(bio) = changes.bio {
            self.bio = if bio.is_empty() { None } else { Some(bio) };
        }
        if let Some(avatar_url) = changes.avatar_url {
            self.avatar_url = if avatar_url.is_empty() { None } else { Some(avatar_url) };
        }
        if let Some(intent) = changes.intent {
            self.intent = Some(intent);
        }
        if let Some(payment_type) = changes.default_payment_type {
            self.default_payment_type = Some(payment_type);
        }
        if let Some(price) = changes.default_price {
            self.default_price = Some(price);
        }
        if let Some(favor_text) = changes.default_favor_text {
            self.default_favor_text = if favor_text.is_empty() { None } else { Some(favor_text) };
        }
        if let Some(presence) = changes.default_presence {
            self.default_presence = Some(presence);
        }
    }
}

/// Owner edit to a profile. Absent fields stay as they are; empty strings
/// clear the nullable text fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileChanges {
    pub display_name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub accommodation_type: Option<AccommodationType>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub intent: Option<Intent>,
    pub default_payment_type: Option<PaymentType>,
    pub default_price: Option<i32>,
    pub default_favor_text: Option<String>,
    pub default_presence: Option<Presence>,
}

impl ProfileChanges {
    pub fn validate(&self) -> Result<(), ProfileError> {
        if let Some(name) = &self.display_name {
            if name.is_empty() {
                return Err(ProfileError::MissingField("display_name"));
            }
            if name.len() > DISPLAY_NAME_MAX_LEN {
                return Err(ProfileError::TooLong {
                    field: "display_name",
                    max: DISPLAY_NAME_MAX_LEN,
                });
            }
        }
        if let Some(city) = &self.city {
            if city.is_empty() {
                return Err(ProfileError::MissingField("city"));
            }
        }
        if let Some(country) = &self.country {
            if country.is_empty() {
                return Err(ProfileError::MissingField("country"));
            }
        }
        if let Some(bio) = &self.bio {
            if bio.len() > BIO_MAX_LEN {
                return Err(ProfileError::TooLong {
                    field: "bio",
                    max: BIO_MAX_LEN,
                });
            }
        }
        if let Some(favor_text) = &self.default_favor_text {
            if favor_text.len() > FAVOR_TEXT_MAX_LEN {
                return Err(ProfileError::TooLong {
                    field: "default_favor_text",
                    max: FAVOR_TEXT_MAX_LEN,
                });
            }
        }
        if let Some(price) = self.default_price {
            if price < 0 {
                return Err(ProfileError::NegativePrice);
            }
        }
        Ok(())
    }
}

/// Metadata for one accommodation photo. The image itself lives in
/// external file storage; only the URL and ordering are tracked here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccommodationPhoto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub photo_url: String,
    pub display_order: i32,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AccommodationPhoto {
    pub fn new(user_id: Uuid, photo_url: String, display_order: i32, caption: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            photo_url,
            display_order,
            caption,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error(transparent)]
    Username(#[from] UsernameError),

    #[error("Missing {0}")]
    MissingField(&'static str),

    #[error("{field} cannot exceed {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Price cannot be negative")]
    NegativePrice,
}

/// Convenience check used when materializing profiles from drafts.
pub fn validate_identity(
    username: &str,
    display_name: &str,
    city: &str,
    country: &str,
) -> Result<(), ProfileError> {
    validate_username(username)?;
    if display_name.is_empty() {
        return Err(ProfileError::MissingField("display_name"));
    }
    if display_name.len() > DISPLAY_NAME_MAX_LEN {
        return Err(ProfileError::TooLong {
            field: "display_name",
            max: DISPLAY_NAME_MAX_LEN,
        });
    }
    if city.is_empty() {
        return Err(ProfileError::MissingField("city"));
    }
    if country.is_empty() {
        return Err(ProfileError::MissingField("country"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use posada_shared::AccommodationStatus;

    fn profile() -> Profile {
        Profile {
            id: Uuid::new_v4(),
            username: "ana".to_string(),
            display_name: "Ana".to_string(),
            city: "Madrid".to_string(),
            country: "Spain".to_string(),
            accommodation_type: AccommodationType::Room,
            bio: None,
            avatar_url: None,
            intent: Some(Intent::Host),
            default_payment_type: Some(PaymentType::FriendPrice),
            default_price: Some(15),
            default_favor_text: None,
            default_presence: Some(Presence::Home),
            onboarding_step: ONBOARDING_COMPLETE,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_default_stay_terms_translate_presence() {
        let terms = profile().default_stay_terms("EUR");

        assert_eq!(terms.accommodation_status, Some(AccommodationStatus::HostPresent));
        assert_eq!(terms.payment_type, Some(PaymentType::FriendPrice));
        assert_eq!(terms.price_amount, Some(15));
        assert_eq!(terms.price_currency, "EUR");
    }

    #[test]
    fn test_apply_skips_absent_fields_and_clears_on_empty() {
        let mut p = profile();
        p.bio = Some("old bio".to_string());

        p.apply(ProfileChanges {
            city: Some("Valencia".to_string()),
            bio: Some(String::new()),
            ..Default::default()
        });

        assert_eq!(p.city, "Valencia");
        assert_eq!(p.bio, None);
        assert_eq!(p.display_name, "Ana");
        assert_eq!(p.username, "ana");
    }

    #[test]
    fn test_changes_validation() {
        let ok = ProfileChanges {
            display_name: Some("Ana María".to_string()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let too_long = ProfileChanges {
            bio: Some("x".repeat(BIO_MAX_LEN + 1)),
            ..Default::default()
        };
        assert!(matches!(
            too_long.validate(),
            Err(ProfileError::TooLong { field: "bio", .. })
        ));

        let blank_name = ProfileChanges {
            display_name: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(
            blank_name.validate(),
            Err(ProfileError::MissingField("display_name"))
        ));

        let negative = ProfileChanges {
            default_price: Some(-5),
            ..Default::default()
        };
        assert!(matches!(negative.validate(), Err(ProfileError::NegativePrice)));
    }
}
