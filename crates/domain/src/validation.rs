//! Ordered, field-scoped validation of a candidate before it is committed.
//!
//! A pipeline is a list of checks, each either bound to a field name or
//! applying to the candidate as a whole. Checks are futures that have not
//! been polled yet, so a skipped check never runs.
//!
//! Execution rules:
//! - field checks run in order; once a field has a failure its remaining
//!   checks are skipped;
//! - a [`ModelError`] is recorded under the field;
//! - a nested [`ValidationError`] is merged as `field.subfield`;
//! - any other error aborts the pipeline and is returned as is;
//! - whole-candidate checks run only while no field failure is recorded, and
//!   any error they return aborts the pipeline as is.

use std::future::Future;
use std::pin::Pin;

use crate::error::{DomainError, ValidationError};

/// Outcome of a single check.
pub type CheckResult = Result<(), DomainError>;

type BoxCheck<'a> = Pin<Box<dyn Future<Output = CheckResult> + Send + 'a>>;

struct Step<'a> {
    field: Option<&'static str>,
    check: BoxCheck<'a>,
}

/// An ordered list of checks against one candidate.
#[must_use = "a pipeline does nothing until `run` is awaited"]
#[derive(Default)]
pub struct ValidationPipeline<'a> {
    steps: Vec<Step<'a>>,
}

impl<'a> ValidationPipeline<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a check bound to `field`.
    pub fn field<F>(mut self, field: &'static str, check: F) -> Self
    where
        F: Future<Output = CheckResult> + Send + 'a,
    {
        self.steps.push(Step {
            field: Some(field),
            check: Box::pin(check),
        });
        self
    }

    /// Appends a check on the candidate as a whole.
    pub fn whole<F>(mut self, check: F) -> Self
    where
        F: Future<Output = CheckResult> + Send + 'a,
    {
        self.steps.push(Step {
            field: None,
            check: Box::pin(check),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs the checks and returns the aggregate of field failures, if any.
    pub async fn run(self) -> CheckResult {
        let mut failures = ValidationError::new();

        for step in self.steps {
            let Some(field) = step.field else {
                if failures.is_empty() {
                    step.check.await?;
                }
                continue;
            };

            if failures.contains(field) {
                continue;
            }

            match step.check.await {
                Ok(()) => {}
                Err(DomainError::Model(error)) => failures.insert(field, error),
                Err(DomainError::Validation(nested)) => failures.merge_nested(field, nested),
                Err(other) => return Err(other),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            tracing::debug!(%failures, "candidate rejected");
            Err(failures.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use entity_store::StoreError;

    use super::*;
    use crate::error::ModelError;

    async fn pass() -> CheckResult {
        Ok(())
    }

    async fn fail(error: ModelError) -> CheckResult {
        Err(error.into())
    }

    async fn counted(counter: &AtomicUsize, result: CheckResult) -> CheckResult {
        counter.fetch_add(1, Ordering::SeqCst);
        result
    }

    fn backend() -> DomainError {
        DomainError::Store(StoreError::Backend("down".into()))
    }

    #[tokio::test]
    async fn empty_pipeline_passes() {
        assert_eq!(ValidationPipeline::new().run().await, Ok(()));
    }

    #[tokio::test]
    async fn collects_failures_from_every_field() {
        let result = ValidationPipeline::new()
            .field("item", fail(ModelError::NotFound))
            .field("user", fail(ModelError::NotFound))
            .field("bid", pass())
            .run()
            .await;

        let expected: ValidationError = [("item", ModelError::NotFound), ("user", ModelError::NotFound)]
            .into_iter()
            .collect();
        assert_eq!(result, Err(DomainError::Validation(expected)));
    }

    #[tokio::test]
    async fn first_failure_per_field_wins() {
        let calls = AtomicUsize::new(0);

        let result = ValidationPipeline::new()
            .field("item", fail(ModelError::NotFound))
            .field("item", counted(&calls, Err(ModelError::LowValue.into())))
            .run()
            .await;

        assert_eq!(
            result,
            Err(ValidationError::single("item", ModelError::NotFound).into())
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn later_check_on_a_passing_field_still_runs() {
        let result = ValidationPipeline::new()
            .field("item", pass())
            .field("item", fail(ModelError::LowValue))
            .run()
            .await;

        assert_eq!(
            result,
            Err(ValidationError::single("item", ModelError::LowValue).into())
        );
    }

    #[tokio::test]
    async fn whole_check_skipped_after_a_field_failure() {
        let calls = AtomicUsize::new(0);

        let result = ValidationPipeline::new()
            .field("user", fail(ModelError::NotFound))
            .whole(counted(&calls, Err(backend())))
            .run()
            .await;

        assert_eq!(
            result,
            Err(ValidationError::single("user", ModelError::NotFound).into())
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn whole_check_failure_aborts_verbatim() {
        let calls = AtomicUsize::new(0);

        let result = ValidationPipeline::new()
            .field("item", pass())
            .whole(fail(ModelError::Conflict))
            .field("user", counted(&calls, Err(ModelError::NotFound.into())))
            .run()
            .await;

        assert_eq!(result, Err(DomainError::Model(ModelError::Conflict)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn nested_aggregate_merges_with_composite_keys() {
        let nested: ValidationError = [("name", ModelError::Required), ("value", ModelError::LowValue)]
            .into_iter()
            .collect();

        let result = ValidationPipeline::new()
            .field("item", async move { Err::<(), DomainError>(nested.into()) })
            .field("user", fail(ModelError::NotFound))
            .run()
            .await;

        let expected: ValidationError = [
            ("item.name", ModelError::Required),
            ("item.value", ModelError::LowValue),
            ("user", ModelError::NotFound),
        ]
        .into_iter()
        .collect();
        assert_eq!(result, Err(expected.into()));
    }

    #[tokio::test]
    async fn non_domain_error_bypasses_aggregation() {
        let calls = AtomicUsize::new(0);

        let result = ValidationPipeline::new()
            .field("item", fail(ModelError::NotFound))
            .field("user", async { Err::<(), _>(backend()) })
            .field("bid", counted(&calls, Ok(())))
            .run()
            .await;

        assert_eq!(result, Err(backend()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
