use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use homzhub_api::{LeaseApi, LeaseTermRequest};
use homzhub_core::domain::lease::{
    validate_lease, AssetUnitId, LeaseSpaceForm, LeaseTermForm,
};
use homzhub_core::notify::{Notification, Notifier, Severity};

use crate::errors::WorkflowError;

/// Validated lease space/term submission. Forms that fail the client-side
/// gate never reach the network; a backend rejection leaves both forms
/// untouched for correction and retry.
pub struct LeaseSubmission {
    api: Arc<dyn LeaseApi>,
    notifier: Arc<dyn Notifier>,
}

impl LeaseSubmission {
    pub fn new(api: Arc<dyn LeaseApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }

    pub async fn submit(
        &self,
        unit: &AssetUnitId,
        space: &LeaseSpaceForm,
        term: &LeaseTermForm,
    ) -> Result<(), WorkflowError> {
        let correlation_id = Uuid::new_v4().to_string();

        let validation = validate_lease(space, term);
        if !validation.is_valid() {
            self.notifier.notify(
                Notification::new(Severity::Error, "leaseFormInvalid", correlation_id.as_str())
                    .with_detail(format!("{:?}", validation.failures)),
            );
            return Err(WorkflowError::LeaseValidation { failures: validation.failures });
        }

        let request = LeaseTermRequest::from_forms(space, term);
        if let Err(error) = self.api.submit_lease_term(unit, &request).await {
            warn!(
                event_name = "lease.term_submit_failed",
                unit_id = unit.0,
                correlation_id = %correlation_id,
                error = %error,
                "lease term submission rejected"
            );
            self.notifier.notify(
                Notification::new(
                    Severity::Error,
                    "leaseTermSubmitFailed",
                    correlation_id.as_str(),
                )
                .with_detail(error.to_string()),
            );
            return Err(error.into());
        }

        self.notifier.notify(Notification::new(
            Severity::Success,
            "leaseTermSubmitSuccess",
            correlation_id.as_str(),
        ));
        info!(
            event_name = "lease.term_submitted",
            unit_id = unit.0,
            correlation_id = %correlation_id,
            "lease term accepted"
        );
        Ok(())
    }
}
