//! License issuance workflow.
//!
//! Single pass: required fields → value objects → entity + folio → invariant
//! gate → persistence. The first failure ends the request; nothing is written
//! unless every check passed.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info, info_span, warn, Instrument, Span};

use common::{AppError, AppResult};
use domain::{
    Diagnosis, DoctorId, Field, Identifier, License, LicenseResponse, NewLicense,
    MAX_FOLIO_ATTEMPTS,
};

use crate::context::RequestContext;
use crate::repository::LicenseRepository;

/// Raw issuance request, as decoded by the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct IssueLicenseInput {
    pub patient_id: String,
    pub doctor_id: String,
    pub diagnosis: String,
    /// `None` when the caller did not send a start date
    pub start_date: Option<NaiveDate>,
    pub days: i32,
}

/// Issues new licenses.
pub struct IssueLicense {
    repo: Arc<dyn LicenseRepository>,
    span: Span,
}

impl IssueLicense {
    pub fn new(repo: Arc<dyn LicenseRepository>) -> Self {
        Self::with_span(repo, info_span!("issue_license"))
    }

    /// Create the workflow logging into the given span
    pub fn with_span(repo: Arc<dyn LicenseRepository>, span: Span) -> Self {
        Self { repo, span }
    }

    pub async fn execute(
        &self,
        ctx: &RequestContext,
        input: IssueLicenseInput,
    ) -> AppResult<LicenseResponse> {
        self.run(ctx, input).instrument(self.span.clone()).await
    }

    async fn run(&self, ctx: &RequestContext, input: IssueLicenseInput) -> AppResult<LicenseResponse> {
        let start_date = validate_required_fields(&input).map_err(|e| {
            warn!(error = %e, "issuance rejected: required field check failed");
            e
        })?;

        let patient_id = Identifier::new(input.patient_id).map_err(|e| {
            warn!(error = %e, "issuance rejected: invalid patient id");
            AppError::invalid(Field::PatientId, e.to_string())
        })?;

        let doctor_id = DoctorId::new(input.doctor_id).map_err(|e| {
            warn!(error = %e, "issuance rejected: invalid doctor id");
            AppError::invalid(Field::DoctorId, "invalid doctorId format")
        })?;

        let diagnosis = Diagnosis::new(input.diagnosis).map_err(|e| {
            warn!(error = %e, "issuance rejected: invalid diagnosis");
            AppError::invalid(Field::Diagnosis, "invalid diagnosis format")
        })?;

        let mut license = License::new(NewLicense {
            patient_id,
            doctor_id,
            diagnosis,
            start_date,
            days: input.days,
        });
        license.generate_folio();

        license.is_valid().map_err(|e| {
            warn!(error = %e, "issuance rejected: license invariant failed");
            AppError::from(e)
        })?;

        self.persist(ctx, &mut license).await?;

        info!(folio = %license.folio, patient_id = %license.patient_id, "license issued");
        Ok(LicenseResponse::from(license))
    }

    /// Save the license, drawing a fresh folio whenever the store reports a
    /// duplicate. Any other failure is returned unchanged.
    async fn persist(&self, ctx: &RequestContext, license: &mut License) -> AppResult<()> {
        let mut attempt = 1;
        loop {
            ctx.ensure_active()?;

            match self.repo.save(ctx, license).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_conflict() && attempt < MAX_FOLIO_ATTEMPTS => {
                    warn!(folio = %license.folio, attempt, "folio collision, assigning a new folio");
                    license.generate_folio();
                    attempt += 1;
                }
                Err(e) => {
                    error!(folio = %license.folio, attempt, error = %e, "failed to save license");
                    return Err(e);
                }
            }
        }
    }
}

/// Reject blank fields and non-positive durations, returning the start date.
fn validate_required_fields(input: &IssueLicenseInput) -> AppResult<NaiveDate> {
    if input.patient_id.trim().is_empty() {
        return Err(AppError::missing(Field::PatientId));
    }
    if input.doctor_id.trim().is_empty() {
        return Err(AppError::missing(Field::DoctorId));
    }
    if input.diagnosis.trim().is_empty() {
        return Err(AppError::missing(Field::Diagnosis));
    }
    let start_date = input
        .start_date
        .ok_or(AppError::missing(Field::StartDate))?;
    if input.days <= 0 {
        return Err(AppError::invalid(
            Field::Days,
            "Days must be greater than 0",
        ));
    }
    Ok(start_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockLicenseRepository;
    use mockall::Sequence;
    use std::sync::Mutex;

    fn valid_input() -> IssueLicenseInput {
        IssueLicenseInput {
            patient_id: "12345678-9".to_string(),
            doctor_id: "D1".to_string(),
            diagnosis: "flu".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 10),
            days: 5,
        }
    }

    /// Repository that must never be reached
    fn untouched_repo() -> MockLicenseRepository {
        let mut repo = MockLicenseRepository::new();
        repo.expect_save().never();
        repo
    }

    #[tokio::test]
    async fn test_issue_success() {
        let mut repo = MockLicenseRepository::new();
        repo.expect_save()
            .withf(|_, license| license.is_issued() && !license.folio.is_empty())
            .times(1)
            .returning(|_, _| Ok(()));

        let workflow = IssueLicense::new(Arc::new(repo));
        let response = workflow
            .execute(&RequestContext::new(), valid_input())
            .await
            .unwrap();

        assert!(response.folio.starts_with("L-"));
        assert_eq!(response.status, "issued");
        assert_eq!(response.patient_id, "12345678-9");
        assert_eq!(response.doctor_id, "D1");
        assert_eq!(response.start_date, "2024-01-10");
        assert_eq!(response.days, 5);
    }

    #[tokio::test]
    async fn test_non_positive_days_rejected_before_save() {
        for days in [0, -3] {
            let workflow = IssueLicense::new(Arc::new(untouched_repo()));
            let input = IssueLicenseInput {
                days,
                ..valid_input()
            };

            let err = workflow
                .execute(&RequestContext::new(), input)
                .await
                .unwrap_err();

            assert!(matches!(err, AppError::InvalidData { field: Field::Days, .. }));
            assert_eq!(err.code(), "INVALID_DAYS");
        }
    }

    #[tokio::test]
    async fn test_missing_fields_reported_in_order() {
        let cases = [
            (IssueLicenseInput { patient_id: " ".into(), ..valid_input() }, Field::PatientId),
            (IssueLicenseInput { doctor_id: String::new(), ..valid_input() }, Field::DoctorId),
            (IssueLicenseInput { diagnosis: String::new(), ..valid_input() }, Field::Diagnosis),
            (IssueLicenseInput { start_date: None, ..valid_input() }, Field::StartDate),
            (IssueLicenseInput::default(), Field::PatientId),
        ];

        for (input, expected) in cases {
            let workflow = IssueLicense::new(Arc::new(untouched_repo()));
            let err = workflow
                .execute(&RequestContext::new(), input)
                .await
                .unwrap_err();

            match err {
                AppError::MissingRequiredField { field } => assert_eq!(field, expected),
                other => panic!("expected missing {expected}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_malformed_patient_id_is_invalid_data_with_format_message() {
        let workflow = IssueLicense::new(Arc::new(untouched_repo()));
        let input = IssueLicenseInput {
            patient_id: "12.345.678-9".to_string(),
            ..valid_input()
        };

        let err = workflow
            .execute(&RequestContext::new(), input)
            .await
            .unwrap_err();

        match err {
            AppError::InvalidData { field, message } => {
                assert_eq!(field, Field::PatientId);
                assert!(message.contains("RUT format"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_ascii_digit_patient_id_is_rejected_before_save() {
        for patient_id in ["١٢٣٤٥٦٧٨-9", "１２３４５６７８-9"] {
            let workflow = IssueLicense::new(Arc::new(untouched_repo()));
            let input = IssueLicenseInput {
                patient_id: patient_id.to_string(),
                ..valid_input()
            };

            let err = workflow
                .execute(&RequestContext::new(), input)
                .await
                .unwrap_err();

            assert!(
                matches!(err, AppError::InvalidData { field: Field::PatientId, .. }),
                "{patient_id} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces_unchanged_without_retry() {
        let mut repo = MockLicenseRepository::new();
        repo.expect_save()
            .times(1)
            .returning(|_, _| Err(AppError::internal("disk full")));

        let workflow = IssueLicense::new(Arc::new(repo));
        let err = workflow
            .execute(&RequestContext::new(), valid_input())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal(ref msg) if msg == "disk full"));
    }

    #[tokio::test]
    async fn test_folio_collision_retries_with_new_folio() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut seq = Sequence::new();
        let mut repo = MockLicenseRepository::new();

        let first = seen.clone();
        repo.expect_save()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_, license| {
                first.lock().unwrap().push(license.folio.clone());
                Err(AppError::conflict("License with this folio"))
            });
        let second = seen.clone();
        repo.expect_save()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_, license| {
                second.lock().unwrap().push(license.folio.clone());
                Ok(())
            });

        let workflow = IssueLicense::new(Arc::new(repo));
        let response = workflow
            .execute(&RequestContext::new(), valid_input())
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_ne!(seen[0], seen[1]);
        assert_eq!(response.folio, seen[1]);
    }

    #[tokio::test]
    async fn test_folio_collisions_give_up_after_max_attempts() {
        let mut repo = MockLicenseRepository::new();
        repo.expect_save()
            .times(MAX_FOLIO_ATTEMPTS as usize)
            .returning(|_, _| Err(AppError::conflict("License with this folio")));

        let workflow = IssueLicense::new(Arc::new(repo));
        let err = workflow
            .execute(&RequestContext::new(), valid_input())
            .await
            .unwrap_err();

        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_cancelled_request_never_reaches_repository() {
        let workflow = IssueLicense::new(Arc::new(untouched_repo()));
        let ctx = RequestContext::new();
        ctx.cancel();

        let err = workflow.execute(&ctx, valid_input()).await.unwrap_err();
        assert!(matches!(err, AppError::Cancelled));
    }
}
