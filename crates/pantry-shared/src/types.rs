use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Store-assigned row ids
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a food item.
///
/// The serialized form is the upper-case code (`"DONATION_CANCELLED"`), which
/// is also what the store persists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FoodStatus {
    #[default]
    Fresh,
    Expiring,
    Expired,
    Donate,
    Donated,
    DonationCancelled,
    Consumed,
}

impl FoodStatus {
    pub const ALL: [FoodStatus; 7] = [
        FoodStatus::Fresh,
        FoodStatus::Expiring,
        FoodStatus::Expired,
        FoodStatus::Donate,
        FoodStatus::Donated,
        FoodStatus::DonationCancelled,
        FoodStatus::Consumed,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Fresh => "FRESH",
            Self::Expiring => "EXPIRING",
            Self::Expired => "EXPIRED",
            Self::Donate => "DONATE",
            Self::Donated => "DONATED",
            Self::DonationCancelled => "DONATION_CANCELLED",
            Self::Consumed => "CONSUMED",
        }
    }

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Fresh => "Fresh",
            Self::Expiring => "Expiring Soon",
            Self::Expired => "Expired",
            Self::Donate => "Marked for Donation",
            Self::Donated => "Donated",
            Self::DonationCancelled => "Donation Cancelled",
            Self::Consumed => "Consumed",
        }
    }
}

impl fmt::Display for FoodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown food status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for FoodStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.code() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A single food item owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FoodItem {
    pub id: ItemId,
    pub owner: UserId,
    /// Example: Milk, Rice, Apples
    pub name: String,
    /// Free text with the unit embedded: "1L", "2kg", "5 pieces"
    pub quantity: String,
    pub category: Option<String>,
    /// Set by the store on creation, never changed afterwards.
    pub added_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub status: FoodStatus,
    pub notes: Option<String>,
}

impl fmt::Display for FoodItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.quantity)
    }
}

/// The owner-editable fields of a food item, as submitted for add or edit.
///
/// Call [`FoodItemDraft::validate`] before handing a draft to a store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FoodItemDraft {
    pub name: String,
    pub quantity: String,
    #[serde(default)]
    pub category: Option<String>,
    pub expiry_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

impl FoodItemDraft {
    /// Copy the draft's fields onto an existing item.
    ///
    /// `id`, `owner`, `added_date` and `status` are left alone.
    pub fn apply_to(&self, item: &mut FoodItem) {
        item.name = self.name.clone();
        item.quantity = self.quantity.clone();
        item.category = self.category.clone();
        item.expiry_date = self.expiry_date;
        item.notes = self.notes.clone();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
}

/// A user-facing message produced by an inventory operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }
}
