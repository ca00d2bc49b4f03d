//! Cleaning pipeline orchestration
//!
//! Runs a sequence of operation descriptors against one frame. Each descriptor
//! is validated only when the pipeline reaches it, so a malformed descriptor
//! late in the list does not prevent earlier operations from running. The
//! first failing operation stops the run; the effects and results of the
//! operations before it are kept.


use crate::constants::{DEFAULT_OUTLIER_THRESHOLD, run_status};
use crate::error::{CleanerError, Result};
use crate::frame::Frame;
use crate::models::{DatasetRef, OperationDescriptor, OperationResult};
use crate::operations::{CleaningOperation, OperationOutcome};
use tracing::{debug, info, warn};

/// Terminal state of a pipeline run
#[derive(Debug)]
pub enum RunStatus {
    Completed,
    Failed(CleanerError),
}

impl RunStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }

    pub fn error(&self) -> Option<&CleanerError> {
        match self {
            RunStatus::Completed => None,
            RunStatus::Failed(error) => Some(error),
        }
    }

    /// Status label written to the run record
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Completed => run_status::COMPLETED,
            RunStatus::Failed(_) => run_status::FAILED,
        }
    }
}

/// Everything produced by one pipeline invocation
#[derive(Debug)]
pub struct PipelineRun {
    pub dataset: DatasetRef,
    /// One entry per successfully executed operation, in submission order
    pub results: Vec<OperationResult>,
    pub total_rows_affected: u64,
    /// Frame after the last successful operation
    pub frame: Frame,
    /// Every row removed as a duplicate, in removal order
    pub duplicates: Option<Frame>,
    pub status: RunStatus,
}

impl PipelineRun {
    fn started(dataset: DatasetRef, frame: Frame) -> Self {
        Self {
            dataset,
            results: Vec::new(),
            total_rows_affected: 0,
            frame,
            duplicates: None,
            status: RunStatus::Completed,
        }
    }

    /// Number of accumulated duplicate rows
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.as_ref().map_or(0, Frame::row_count)
    }

    fn absorb(&mut self, descriptor: &OperationDescriptor, outcome: OperationOutcome) -> Result<()> {
        let duplicates = match (self.duplicates.take(), outcome.duplicates) {
            (Some(mut accumulated), Some(found)) => {
                accumulated.append(&found)?;
                Some(accumulated)
            }
            (accumulated, found) => accumulated.or(found),
        };

        self.duplicates = duplicates;
        self.frame = outcome.frame;
        self.total_rows_affected += outcome.rows_affected;
        self.results.push(OperationResult {
            kind: descriptor.kind.clone(),
            parameters: descriptor.parameters.clone(),
            rows_affected: outcome.rows_affected,
        });
        Ok(())
    }
}

/// Sequential executor of cleaning operations
#[derive(Debug, Clone)]
pub struct CleaningPipeline {
    default_threshold: f64,
}

impl Default for CleaningPipeline {
    fn default() -> Self {
        Self {
            default_threshold: DEFAULT_OUTLIER_THRESHOLD,
        }
    }
}

impl CleaningPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outlier threshold used when a descriptor does not carry one
    pub fn with_default_threshold(mut self, threshold: f64) -> Self {
        self.default_threshold = threshold;
        self
    }

    pub fn default_threshold(&self) -> f64 {
        self.default_threshold
    }

    /// Apply `operations` in order to `frame`
    ///
    /// Never returns an error: an operation failure is captured in the run's
    /// status together with everything done before it.
    pub fn run(
        &self,
        dataset: DatasetRef,
        frame: Frame,
        operations: &[OperationDescriptor],
    ) -> PipelineRun {
        info!(
            "Cleaning dataset {} ({}): {} operations on {} rows",
            dataset.id,
            dataset.name,
            operations.len(),
            frame.row_count()
        );

        let mut run = PipelineRun::started(dataset, frame);

        for (index, descriptor) in operations.iter().enumerate() {
            let step = self
                .execute(&run.frame, descriptor)
                .and_then(|outcome| run.absorb(descriptor, outcome));

            if let Err(error) = step {
                warn!(
                    "Operation {} ('{}') failed, stopping run: {}",
                    index + 1,
                    descriptor.kind,
                    error
                );
                run.status = RunStatus::Failed(error);
                return run;
            }
        }

        info!(
            "Cleaning complete: {} rows affected, {} rows remain, {} duplicates",
            run.total_rows_affected,
            run.frame.row_count(),
            run.duplicate_count()
        );
        run
    }

    fn execute(&self, frame: &Frame, descriptor: &OperationDescriptor) -> Result<OperationOutcome> {
        let operation = CleaningOperation::from_descriptor_with(descriptor, self.default_threshold)?;

        if let CleaningOperation::Unrecognized(kind) = &operation {
            warn!("Unrecognized operation kind '{}', skipping", kind);
        } else {
            debug!("Applying {}", operation);
        }

        let outcome = operation.apply(frame)?;
        info!("{}: {} affected", operation, outcome.rows_affected);
        Ok(outcome)
    }
}
