//! Vendor registration records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::registration_store::StoreError;

/// Review status of a vendor request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorStatus {
    /// Awaiting admin review
    Pending,
    /// Accepted by an admin
    Approved,
    /// Declined by an admin
    Rejected,
}

impl VendorStatus {
    /// Convert status to its storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parse status from its storage representation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the string doesn't match a known status.
    pub fn parse(s: &str) -> Result<Self, StoreError> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(StoreError::Database(format!("Invalid vendor status: {s}"))),
        }
    }
}

impl std::fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer to one verification question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorAnswer {
    /// Question identifier
    pub question_id: String,
    /// Question as shown to the vendor
    pub question_text: String,
    /// Vendor's answer
    pub answer: String,
}

/// A validated registration, ready to be stored or published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVendorRequest {
    /// Business name
    pub name: String,
    /// Owner's full name
    pub owner_name: String,
    /// Contact email, normalized with [`normalize_email`]
    pub email: String,
    /// Phone number
    pub phone: Option<String>,
    /// Country
    pub country: Option<String>,
    /// Tax identifier
    pub tax_id: Option<String>,
    /// Website
    pub website: Option<String>,
    /// Free-text description
    pub about: Option<String>,
    /// Verification answers, never empty
    pub questions: Vec<VendorAnswer>,
    /// Uploaded document references
    pub documents: Vec<String>,
    /// When the request was received
    pub submitted_at: DateTime<Utc>,
}

/// A stored vendor request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRequest {
    /// Store-assigned identifier
    pub id: i64,
    /// Business name
    pub name: String,
    /// Owner's full name
    pub owner_name: String,
    /// Contact email
    pub email: String,
    /// Phone number
    pub phone: Option<String>,
    /// Country
    pub country: Option<String>,
    /// Tax identifier
    pub tax_id: Option<String>,
    /// Website
    pub website: Option<String>,
    /// Free-text description
    pub about: Option<String>,
    /// Verification answers
    pub questions: Vec<VendorAnswer>,
    /// Uploaded document references
    pub documents: Vec<String>,
    /// Review status
    pub status: VendorStatus,
    /// Notes left by the reviewing admin
    pub admin_notes: Option<String>,
    /// Who reviewed the request
    pub reviewer: Option<String>,
    /// When the request was received
    pub submitted_at: DateTime<Utc>,
    /// When the request was reviewed; `None` while pending
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl VendorRequest {
    /// Materialize a stored record from a new request.
    #[must_use]
    pub fn from_new(id: i64, request: NewVendorRequest) -> Self {
        Self {
            id,
            name: request.name,
            owner_name: request.owner_name,
            email: request.email,
            phone: request.phone,
            country: request.country,
            tax_id: request.tax_id,
            website: request.website,
            about: request.about,
            questions: request.questions,
            documents: request.documents,
            status: VendorStatus::Pending,
            admin_notes: None,
            reviewer: None,
            submitted_at: request.submitted_at,
            reviewed_at: None,
        }
    }

    /// Apply an admin review. Status, notes, reviewer and review time change together.
    pub fn apply_review(&mut self, review: Review) {
        self.status = review.status;
        self.admin_notes = review.admin_notes;
        self.reviewer = review.reviewer;
        self.reviewed_at = Some(review.reviewed_at);
    }
}

/// An admin decision on a vendor request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    /// New status
    pub status: VendorStatus,
    /// Notes for the record
    pub admin_notes: Option<String>,
    /// Reviewer identity
    pub reviewer: Option<String>,
    /// Decision time
    pub reviewed_at: DateTime<Utc>,
}

/// Normalize an email for storage and duplicate detection.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn vendor_status_roundtrip() {
        for status in &[
            VendorStatus::Pending,
            VendorStatus::Approved,
            VendorStatus::Rejected,
        ] {
            let parsed = VendorStatus::parse(status.as_str()).unwrap();
            assert_eq!(*status, parsed);
        }
    }

    #[test]
    fn vendor_status_invalid() {
        assert!(VendorStatus::parse("archived").is_err());
    }

    #[test]
    fn review_sets_all_fields_together() {
        let now = Utc::now();
        let mut request = VendorRequest::from_new(
            7,
            NewVendorRequest {
                name: "Cork & Co".into(),
                owner_name: "Ana".into(),
                email: "ana@example.com".into(),
                phone: None,
                country: Some("PT".into()),
                tax_id: None,
                website: None,
                about: None,
                questions: vec![VendorAnswer {
                    question_id: "1".into(),
                    question_text: "What do you sell?".into(),
                    answer: "Cork bags".into(),
                }],
                documents: Vec::new(),
                submitted_at: now,
            },
        );
        assert_eq!(request.status, VendorStatus::Pending);
        assert!(request.reviewed_at.is_none());

        request.apply_review(Review {
            status: VendorStatus::Approved,
            admin_notes: Some("looks good".into()),
            reviewer: Some("admin".into()),
            reviewed_at: now,
        });

        assert_eq!(request.status, VendorStatus::Approved);
        assert_eq!(request.admin_notes.as_deref(), Some("looks good"));
        assert_eq!(request.reviewer.as_deref(), Some("admin"));
        assert_eq!(request.reviewed_at, Some(now));
    }

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }
}
