use tracing::{debug, trace};

use super::{Validatable, ValidationContext, ValidatorSpec};

/// Runs validator specs against a record.
pub struct ValidationRunner;

impl ValidationRunner {
    /// Clear the record's errors, run every applicable spec in order, and
    /// report whether the record ended up without errors.
    pub fn run<R: Validatable>(
        record: &mut R,
        specs: &[ValidatorSpec<R>],
        context: &ValidationContext,
    ) -> bool {
        record.errors_mut().clear();

        let mut ran = 0usize;
        for spec in specs {
            if !spec.applies(record, context) {
                trace!(kind = spec.validator().kind(), %context, "validator skipped");
                continue;
            }
            spec.validator().validate(record);
            ran += 1;
        }

        let errors = record.errors().len();
        debug!(%context, validators = ran, errors, "validation run");
        errors == 0
    }
}
