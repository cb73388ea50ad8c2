use crate::models::Profile;
use serde::Serialize;

/// One completeness check with its contribution to the score.
struct Check {
    label: &'static str,
    done: bool,
    weight: u8,
}

/// How far along a profile is, as a percentage plus the labels of what is
/// still missing. Shown on the dashboard until it reaches 100%.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Completeness {
    pub percentage: u8,
    pub missing: Vec<&'static str>,
}

impl Completeness {
    /// Score a profile against its photos and published availability.
    ///
    /// Weights: username 20, profile photo 20, space photos 20, bio 10,
    /// availability 30. Publishing dates is weighted heaviest because a
    /// profile without a calendar cannot receive requests.
    pub fn evaluate(profile: &Profile, photo_count: usize, availability_count: usize) -> Self {
        let checks = [
            Check {
                label: "username",
                done: !profile.username.is_empty(),
                weight: 20,
            },
            Check {
                label: "profile photo",
                done: profile.avatar_url.is_some(),
                weight: 20,
            },
            Check {
                label: "space photos",
                done: photo_count > 0,
                weight: 20,
            },
            Check {
                label: "bio",
                done: profile.bio.is_some(),
                weight: 10,
            },
            Check {
                label: "availability",
                done: availability_count > 0,
                weight: 30,
            },
        ];

        let percentage = checks.iter().filter(|c| c.done).map(|c| c.weight).sum();
        let missing = checks.iter().filter(|c| !c.done).map(|c| c.label).collect();

        Self {
            percentage,
            missing,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.percentage == 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ONBOARDING_COMPLETE;
    use chrono::Utc;
    use posada_shared::AccommodationType;
    use uuid::Uuid;

    fn bare_profile() -> Profile {
        Profile {
            id: Uuid::new_v4(),
            username: "ana".to_string(),
            display_name: "Ana".to_string(),
            city: "Madrid".to_string(),
            country: "Spain".to_string(),
            accommodation_type: AccommodationType::Sofa,
            bio: None,
            avatar_url: None,
            intent: None,
            default_payment_type: None,
            default_price: None,
            default_favor_text: None,
            default_presence: None,
            onboarding_step: ONBOARDING_COMPLETE,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_fresh_profile_scores_username_only() {
        let score = Completeness::evaluate(&bare_profile(), 0, 0);

        assert_eq!(score.percentage, 20);
        assert_eq!(
            score.missing,
            vec!["profile photo", "space photos", "bio", "availability"]
        );
        assert!(!score.is_complete());
    }

    #[test]
    fn test_each_check_adds_its_weight() {
        let mut profile = bare_profile();
        profile.avatar_url = Some("https://cdn.example/ana.webp".to_string());

        // username 20 + avatar 20 + space photos 20
        let score = Completeness::evaluate(&profile, 2, 0);
        assert_eq!(score.percentage, 60);
        assert_eq!(score.missing, vec!["bio", "availability"]);

        // availability alone is worth 30
        let score = Completeness::evaluate(&bare_profile(), 0, 1);
        assert_eq!(score.percentage, 50);
    }

    #[test]
    fn test_full_profile_is_complete() {
        let mut profile = bare_profile();
        profile.avatar_url = Some("https://cdn.example/ana.webp".to_string());
        profile.bio = Some("Traveler and plant parent".to_string());

        let score = Completeness::evaluate(&profile, 3, 2);

        assert_eq!(score.percentage, 100);
        assert!(score.missing.is_empty());
        assert!(score.is_complete());
    }
}
