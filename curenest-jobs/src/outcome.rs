use anyhow::{Context, Result};
use curenest::entities::NestingBatch;
use curenest::io::export::export_batch;
use curenest::io::ext_repr::ExtNestingBatch;
use curenest::io::import::import_batch;
use serde::{Deserialize, Serialize};

/// Result of a nesting job
#[derive(Clone, Debug, PartialEq)]
pub enum JobOutcome {
    /// The optimizer produced a batch
    Nesting(NestingBatch),
    /// The optimizer itself failed
    Failed { reason: String },
}

/// External representation of a [`JobOutcome`], tagged by `kind`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtJobResult {
    Nesting(ExtNestingBatch),
    Failed { reason: String },
}

pub fn export_outcome(outcome: &JobOutcome) -> ExtJobResult {
    match outcome {
        JobOutcome::Nesting(batch) => ExtJobResult::Nesting(export_batch(batch)),
        JobOutcome::Failed { reason } => ExtJobResult::Failed {
            reason: reason.clone(),
        },
    }
}

pub fn import_outcome(ext_result: &ExtJobResult) -> Result<JobOutcome> {
    match ext_result {
        ExtJobResult::Nesting(ext_batch) => {
            let batch = import_batch(ext_batch)
                .with_context(|| format!("malformed batch {}", ext_batch.batch_id))?;
            Ok(JobOutcome::Nesting(batch))
        }
        ExtJobResult::Failed { reason } => Ok(JobOutcome::Failed {
            reason: reason.clone(),
        }),
    }
}
