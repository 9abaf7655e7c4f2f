//! License domain entity and related types.

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    DATE_FORMAT, FOLIO_PREFIX, FOLIO_SUFFIX_LEN, STATUS_EXPIRED, STATUS_ISSUED, STATUS_REVOKED,
};
use crate::error::{DomainError, DomainResult, Field};
use crate::value_objects::{Diagnosis, DoctorId, Identifier};

/// License status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    Issued,
    Expired,
    Revoked,
}

impl LicenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseStatus::Issued => STATUS_ISSUED,
            LicenseStatus::Expired => STATUS_EXPIRED,
            LicenseStatus::Revoked => STATUS_REVOKED,
        }
    }
}

impl FromStr for LicenseStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_ISSUED => Ok(LicenseStatus::Issued),
            STATUS_EXPIRED => Ok(LicenseStatus::Expired),
            STATUS_REVOKED => Ok(LicenseStatus::Revoked),
            other => Err(DomainError::invalid(
                Field::Status,
                format!("unknown license status '{}'", other),
            )),
        }
    }
}

impl From<LicenseStatus> for String {
    fn from(status: LicenseStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validated data a license is assembled from
#[derive(Debug, Clone)]
pub struct NewLicense {
    pub patient_id: Identifier,
    pub doctor_id: DoctorId,
    pub diagnosis: Diagnosis,
    pub start_date: NaiveDate,
    pub days: i32,
}

/// Medical leave-of-absence certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// Certificate number, empty until `generate_folio` runs
    pub folio: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub diagnosis: String,
    pub start_date: NaiveDate,
    pub days: i32,
    pub status: LicenseStatus,
}

impl License {
    /// Assemble a freshly issued license.
    ///
    /// No checks run here: the value objects already hold valid data and
    /// `is_valid` is the explicit invariant gate.
    pub fn new(data: NewLicense) -> Self {
        Self {
            folio: String::new(),
            patient_id: data.patient_id.into_inner(),
            doctor_id: data.doctor_id.into_inner(),
            diagnosis: data.diagnosis.into_inner(),
            start_date: data.start_date,
            days: data.days,
            status: LicenseStatus::Issued,
        }
    }

    /// Assign a new certificate number.
    ///
    /// Format: `L-{unix seconds}-{8 hex chars}`. The random suffix keeps two
    /// licenses issued within the same second apart; the store's unique
    /// constraint on folio remains the final guard. Only called before the
    /// license is persisted.
    pub fn generate_folio(&mut self) {
        let suffix = Uuid::new_v4().simple().to_string();
        self.folio = format!(
            "{}{}-{}",
            FOLIO_PREFIX,
            Utc::now().timestamp(),
            &suffix[..FOLIO_SUFFIX_LEN]
        );
    }

    /// Invariant gate run once before persistence.
    ///
    /// Only freshly issued licenses with a positive duration pass.
    pub fn is_valid(&self) -> DomainResult<()> {
        if self.days <= 0 {
            return Err(DomainError::invalid(
                Field::Days,
                "Days must be greater than 0",
            ));
        }
        if self.status != LicenseStatus::Issued {
            return Err(DomainError::invalid(
                Field::Status,
                format!("license status must be issued, found {}", self.status),
            ));
        }
        Ok(())
    }

    /// Check if license is currently in the issued state
    pub fn is_issued(&self) -> bool {
        self.status == LicenseStatus::Issued
    }
}

/// License response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct LicenseResponse {
    /// Certificate number
    #[cfg_attr(feature = "openapi", schema(example = "L-1704844800-3f9a1c2b"))]
    pub folio: String,
    /// Patient RUT
    #[cfg_attr(feature = "openapi", schema(example = "12345678-9"))]
    pub patient_id: String,
    /// Issuing doctor identifier
    #[cfg_attr(feature = "openapi", schema(example = "D1"))]
    pub doctor_id: String,
    pub diagnosis: String,
    /// First day of leave (YYYY-MM-DD)
    #[cfg_attr(feature = "openapi", schema(example = "2024-01-10"))]
    pub start_date: String,
    /// Leave duration in days
    pub days: i32,
    /// issued, expired or revoked
    #[cfg_attr(feature = "openapi", schema(example = "issued"))]
    pub status: String,
}

impl From<License> for LicenseResponse {
    fn from(license: License) -> Self {
        Self {
            folio: license.folio,
            patient_id: license.patient_id,
            doctor_id: license.doctor_id,
            diagnosis: license.diagnosis,
            start_date: license.start_date.format(DATE_FORMAT).to_string(),
            days: license.days,
            status: license.status.to_string(),
        }
    }
}

impl From<&License> for LicenseResponse {
    fn from(license: &License) -> Self {
        LicenseResponse::from(license.clone())
    }
}

impl TryFrom<LicenseResponse> for License {
    type Error = DomainError;

    fn try_from(response: LicenseResponse) -> Result<Self, Self::Error> {
        let start_date = NaiveDate::parse_from_str(&response.start_date, DATE_FORMAT)
            .map_err(|_| DomainError::invalid(Field::StartDate, "invalid date"))?;

        Ok(Self {
            folio: response.folio,
            patient_id: response.patient_id,
            doctor_id: response.doctor_id,
            diagnosis: response.diagnosis,
            start_date,
            days: response.days,
            status: response.status.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> License {
        License::new(NewLicense {
            patient_id: Identifier::new("12345678-9").unwrap(),
            doctor_id: DoctorId::new("D1").unwrap(),
            diagnosis: Diagnosis::new("flu").unwrap(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            days: 5,
        })
    }

    #[test]
    fn test_new_license_is_issued_without_folio() {
        let license = sample();
        assert!(license.is_issued());
        assert!(license.folio.is_empty());
        assert_eq!(license.patient_id, "12345678-9");
    }

    #[test]
    fn test_generate_folio_format() {
        let mut license = sample();
        license.generate_folio();

        let parts: Vec<&str> = license.folio.splitn(3, '-').collect();
        assert_eq!(parts[0], "L");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), FOLIO_SUFFIX_LEN);
    }

    #[test]
    fn test_generated_folios_differ_within_same_second() {
        let mut a = sample();
        let mut b = sample();
        a.generate_folio();
        b.generate_folio();
        assert_ne!(a.folio, b.folio);
    }

    #[test]
    fn test_is_valid_accepts_new_license_repeatedly() {
        let license = sample();
        assert!(license.is_valid().is_ok());
        assert!(license.is_valid().is_ok());
    }

    #[test]
    fn test_is_valid_rejects_non_positive_days() {
        let mut license = sample();
        license.days = 0;
        let first = license.is_valid().unwrap_err();
        assert_eq!(first.field(), Field::Days);
        assert_eq!(license.is_valid().unwrap_err(), first);
    }

    #[test]
    fn test_is_valid_rejects_revoked() {
        let mut license = sample();
        license.status = LicenseStatus::Revoked;
        assert_eq!(license.is_valid().unwrap_err().field(), Field::Status);
        assert!(!license.is_issued());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("expired".parse::<LicenseStatus>().unwrap(), LicenseStatus::Expired);
        assert!("cancelled".parse::<LicenseStatus>().is_err());
        assert_eq!(String::from(LicenseStatus::Revoked), "revoked");
    }

    #[test]
    fn test_response_round_trip() {
        let mut license = sample();
        license.generate_folio();

        let response = LicenseResponse::from(&license);
        assert_eq!(response.start_date, "2024-01-10");
        assert_eq!(response.status, "issued");

        let back = License::try_from(response).unwrap();
        assert_eq!(back, license);
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let json = serde_json::to_value(LicenseResponse::from(sample())).unwrap();
        assert_eq!(json["patientId"], "12345678-9");
        assert_eq!(json["doctorId"], "D1");
        assert_eq!(json["startDate"], "2024-01-10");
        assert_eq!(json["days"], 5);
    }
}
