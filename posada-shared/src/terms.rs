use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What kind of sleeping spot a host offers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccommodationType {
    Room,
    Sofa,
    Airbed,
    Other,
}

/// Who is around during the stay.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccommodationStatus {
    Empty,
    HostPresent,
    Shared,
}

/// What the host expects in return for the stay.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Free,
    FriendPrice,
    Favor,
    Service,
}

/// Whether an account joined to host, to travel, or both.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Host,
    Guest,
    Both,
}

/// Default presence preference on a profile. Maps onto
/// [`AccommodationStatus`] when pre-filling a new availability entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Home,
    Empty,
    Shared,
}

impl Presence {
    pub fn as_accommodation_status(&self) -> AccommodationStatus {
        match self {
            Presence::Home => AccommodationStatus::HostPresent,
            Presence::Empty => AccommodationStatus::Empty,
            Presence::Shared => AccommodationStatus::Shared,
        }
    }
}

/// The conditions attached to a stay: who is around, what is expected in
/// return, and the price when one applies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StayTerms {
    pub accommodation_status: Option<AccommodationStatus>,
    pub payment_type: Option<PaymentType>,
    pub price_amount: Option<i32>,
    pub price_currency: String,
    pub favor_description: Option<String>,
}

impl AccommodationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccommodationType::Room => "room",
            AccommodationType::Sofa => "sofa",
            AccommodationType::Airbed => "airbed",
            AccommodationType::Other => "other",
        }
    }
}

impl FromStr for AccommodationType {
    type Err = UnknownTerm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "room" => Ok(AccommodationType::Room),
            "sofa" => Ok(AccommodationType::Sofa),
            "airbed" => Ok(AccommodationType::Airbed),
            "other" => Ok(AccommodationType::Other),
            _ => Err(UnknownTerm::new("accommodation_type", s)),
        }
    }
}

impl AccommodationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccommodationStatus::Empty => "empty",
            AccommodationStatus::HostPresent => "host_present",
            AccommodationStatus::Shared => "shared",
        }
    }
}

impl FromStr for AccommodationStatus {
    type Err = UnknownTerm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "empty" => Ok(AccommodationStatus::Empty),
            "host_present" => Ok(AccommodationStatus::HostPresent),
            "shared" => Ok(AccommodationStatus::Shared),
            _ => Err(UnknownTerm::new("accommodation_status", s)),
        }
    }
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Free => "free",
            PaymentType::FriendPrice => "friend_price",
            PaymentType::Favor => "favor",
            PaymentType::Service => "service",
        }
    }
}

impl FromStr for PaymentType {
    type Err = UnknownTerm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(PaymentType::Free),
            "friend_price" => Ok(PaymentType::FriendPrice),
            "favor" => Ok(PaymentType::Favor),
            "service" => Ok(PaymentType::Service),
            _ => Err(UnknownTerm::new("payment_type", s)),
        }
    }
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Host => "host",
            Intent::Guest => "guest",
            Intent::Both => "both",
        }
    }
}

impl FromStr for Intent {
    type Err = UnknownTerm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "host" => Ok(Intent::Host),
            "guest" => Ok(Intent::Guest),
            "both" => Ok(Intent::Both),
            _ => Err(UnknownTerm::new("intent", s)),
        }
    }
}

impl Presence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Home => "home",
            Presence::Empty => "empty",
            Presence::Shared => "shared",
        }
    }
}

impl FromStr for Presence {
    type Err = UnknownTerm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Presence::Home),
            "empty" => Ok(Presence::Empty),
            "shared" => Ok(Presence::Shared),
            _ => Err(UnknownTerm::new("presence", s)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unrecognized {field} value: {value}")]
pub struct UnknownTerm {
    pub field: &'static str,
    pub value: String,
}

impl UnknownTerm {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_strings_round_trip() {
        assert_eq!("host_present".parse::<AccommodationStatus>().unwrap(), AccommodationStatus::HostPresent);
        assert_eq!(AccommodationStatus::HostPresent.as_str(), "host_present");
        assert_eq!("friend_price".parse::<PaymentType>().unwrap(), PaymentType::FriendPrice);
        assert_eq!(PaymentType::FriendPrice.as_str(), "friend_price");
        assert!("couch".parse::<AccommodationType>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_wire_values() {
        let json = serde_json::to_string(&PaymentType::FriendPrice).unwrap();
        assert_eq!(json, "\"friend_price\"");

        let status: AccommodationStatus = serde_json::from_str("\"host_present\"").unwrap();
        assert_eq!(status, AccommodationStatus::HostPresent);
    }

    #[test]
    fn test_presence_maps_to_accommodation_status() {
        assert_eq!(Presence::Home.as_accommodation_status(), AccommodationStatus::HostPresent);
        assert_eq!(Presence::Empty.as_accommodation_status(), AccommodationStatus::Empty);
        assert_eq!(Presence::Shared.as_accommodation_status(), AccommodationStatus::Shared);
    }
}
