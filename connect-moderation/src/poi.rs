//! Point-of-interest domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Moderation status of a point of interest.
///
/// Every POI starts in `Pending`. There is no terminal state: rejected POIs
/// may be reapproved, and approved POIs may still be rejected later.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PoiStatus {
    /// Awaiting moderation
    Pending,
    /// Approved and publicly visible
    Approved,
    /// Rejected by a moderator
    Rejected,
}

impl PoiStatus {
    /// Parse status from string representation.
    ///
    /// # Examples
    ///
    /// ```
    /// use connect_moderation::PoiStatus;
    ///
    /// assert_eq!(PoiStatus::parse("approved"), Some(PoiStatus::Approved));
    /// assert_eq!(PoiStatus::parse("PENDING"), Some(PoiStatus::Pending));
    /// assert_eq!(PoiStatus::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl Default for PoiStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl std::fmt::Display for PoiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for submitting a new point of interest.
///
/// # Examples
///
/// ```
/// use connect_moderation::NewPoi;
///
/// let poi = NewPoi::new("Marché Central", "Avenue Kennedy")
///     .with_quartier("Centre commercial")
///     .with_location(3.868, 11.516);
/// assert_eq!(poi.name, "Marché Central");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPoi {
    /// Name of the place
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Street address
    pub address: String,

    /// Neighbourhood the place belongs to
    pub quartier: Option<String>,

    /// Latitude in decimal degrees
    pub latitude: Option<f64>,

    /// Longitude in decimal degrees
    pub longitude: Option<f64>,
}

impl NewPoi {
    /// Create a submission from the required fields.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            address: address.into(),
            quartier: None,
            latitude: None,
            longitude: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the neighbourhood.
    pub fn with_quartier(mut self, quartier: impl Into<String>) -> Self {
        self.quartier = Some(quartier.into());
        self
    }

    /// Set the geographic coordinates.
    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }
}

/// A point of interest in the directory.
///
/// The `status`, `approved_by`, and `is_verify` fields are owned by the
/// moderation service; every other code path treats them as read-only.
///
/// # Examples
///
/// ```
/// use connect_moderation::{NewPoi, Poi, PoiStatus};
/// use uuid::Uuid;
///
/// let poi = Poi::new(NewPoi::new("Musée National", "Rue de Narvik"), Uuid::now_v7());
/// assert_eq!(poi.status, PoiStatus::Pending);
/// assert!(!poi.is_verify);
/// assert!(poi.approved_by.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poi {
    /// Unique identifier
    pub id: Uuid,

    /// Name of the place
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Street address
    pub address: String,

    /// Neighbourhood the place belongs to
    pub quartier: Option<String>,

    /// Latitude in decimal degrees
    pub latitude: Option<f64>,

    /// Longitude in decimal degrees
    pub longitude: Option<f64>,

    /// Moderation status
    pub status: PoiStatus,

    /// User who submitted the POI
    pub created_by: Uuid,

    /// Moderator who last approved or rejected the POI
    pub approved_by: Option<Uuid>,

    /// Whether the POI has passed moderation
    pub is_verify: bool,

    /// When the POI was submitted
    pub created_at: DateTime<Utc>,

    /// When the POI was last updated
    pub updated_at: DateTime<Utc>,
}

impl Poi {
    /// Create a POI from a submission.
    ///
    /// The POI starts in `Pending` with no moderator and `is_verify` unset.
    ///
    /// # Arguments
    ///
    /// * `new` - The submitted fields
    /// * `created_by` - User who submitted the POI
    pub fn new(new: NewPoi, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: new.name,
            description: new.description,
            address: new.address,
            quartier: new.quartier,
            latitude: new.latitude,
            longitude: new.longitude,
            status: PoiStatus::Pending,
            created_by,
            approved_by: None,
            is_verify: false,
            created_at: now,
            updated_at: now,
        }
    }
}
