//! Capability activation and ordered import attempts.

use std::path::Path;

use tracing::{debug, info, warn};

use meshglb_core::error::AppError;
use meshglb_core::traits::SceneHost;
use meshglb_core::types::ImportOperation;

use crate::error::ConversionError;
use crate::formats::FormatStrategy;
use crate::models::FormatFamily;
use crate::reporter::StatusReporter;

/// Run `attempts` in order and return the first one for which `run`
/// succeeds. Errors of discarded attempts are passed to `discard`; the
/// error of the final attempt is returned when none succeed. `None` means
/// there was nothing to try.
pub fn first_success<A, E>(
    attempts: impl IntoIterator<Item = A>,
    mut run: impl FnMut(&A) -> Result<(), E>,
    mut discard: impl FnMut(&A, &E),
) -> Result<A, Option<E>> {
    let mut last: Option<(A, E)> = None;
    for attempt in attempts {
        if let Some((previous, err)) = last.take() {
            discard(&previous, &err);
        }
        match run(&attempt) {
            Ok(()) => return Ok(attempt),
            Err(err) => last = Some((attempt, err)),
        }
    }
    Err(last.map(|(_, err)| err))
}

/// Drives the import stage of a strategy against a host.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportExecutor;

impl ImportExecutor {
    /// Enable every capability the strategy lists. Failures become
    /// warnings; nothing here stops the pipeline.
    pub fn enable_capabilities<H: SceneHost + ?Sized>(
        host: &mut H,
        strategy: &FormatStrategy,
        reporter: &mut dyn StatusReporter,
    ) -> Vec<String> {
        let mut warnings = Vec::new();
        for capability in strategy.capabilities {
            match host.enable_capability(*capability) {
                Ok(()) => debug!(addon = %capability, "Add-on enabled"),
                Err(e) => {
                    let message = format!("Cannot enable addon {capability}: {}", e.message);
                    warn!(addon = %capability, error = %e, "Add-on activation failed");
                    reporter.warn(&message);
                    warnings.push(message);
                }
            }
        }
        warnings
    }

    /// Try the strategy's import attempts in order. Returns the operation
    /// that succeeded.
    ///
    /// Objects added by a failed attempt stay in the scene.
    pub fn run<H: SceneHost + ?Sized>(
        host: &mut H,
        strategy: &FormatStrategy,
        input: &Path,
    ) -> Result<ImportOperation, ConversionError> {
        let result = first_success(
            strategy.attempts.iter().copied(),
            |op| {
                debug!(operator = %op, path = %input.display(), "Trying import operator");
                host.import(*op, input)
            },
            |op, err| debug!(operator = %op, error = %err, "Import attempt failed, trying next"),
        );

        match result {
            Ok(op) => {
                info!(operator = %op, family = %strategy.family, "Import succeeded");
                Ok(op)
            }
            Err(last) => {
                let source = last.unwrap_or_else(|| {
                    AppError::internal(format!("no import attempts defined for {}", strategy.family))
                });
                debug!(error = %source, "Last import attempt failed");
                Err(match strategy.family {
                    FormatFamily::Usd => ConversionError::UsdImportFailed { source },
                    FormatFamily::Obj | FormatFamily::Ply => ConversionError::ImportFailed { source },
                })
            }
        }
    }
}
