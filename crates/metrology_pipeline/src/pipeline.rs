//! The resolution pass.
//!
//! A pass turns declarations into a published [`Population`] in four stages:
//!
//! 1. **Processing** - every declaration is processed independently.
//! 2. **Tally** - identities and kinds of all definitions are counted once.
//! 3. **Validation** - definitions are validated against a snapshot of the
//!    survivors; rejected ones are removed and the rest validated again until
//!    a round rejects nothing.
//! 4. **Assembly** - validated definitions become the published population.
//!
//! Stages 1 and 3 run on the rayon pool when the configuration asks for it.
//! Inputs are sorted before assembly, so parallel and sequential passes
//! publish identical results.
//!
//! If validation stops at the round limit with failures left, definitions
//! requiring a type that is not published are withheld as well.

use std::collections::BTreeSet;

use metrology_declaration::{Declaration, Definition, process};
use metrology_foundation::{Diagnostic, Outcome, Result, Severity, TypeIdentity, sort_canonically};
use metrology_population::{
    DeclarationTally, Partition, Population, Processed, Resolved, ValidatedDefinition, Validator,
    assemble,
};
use rayon::prelude::*;
use tracing::{debug, instrument, warn};

use crate::cancel::CancellationToken;
use crate::config::PipelineConfig;

// =============================================================================
// Compilation
// =============================================================================

/// Counters describing one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Declarations given to the pass.
    pub declarations: usize,
    /// Definitions produced by processing.
    pub definitions: usize,
    /// Validation rounds run.
    pub rounds: usize,
    /// Definitions rejected by validation.
    pub rejected: usize,
    /// Types in the published population.
    pub resolved: usize,
}

/// The result of a pass: the published population and every diagnostic.
#[derive(Clone, Debug)]
pub struct Compilation {
    population: Population<Resolved>,
    diagnostics: Vec<Diagnostic>,
    stats: PassStats,
    warnings_as_errors: bool,
}

impl Compilation {
    /// Returns the published population.
    #[must_use]
    pub fn population(&self) -> &Population<Resolved> {
        &self.population
    }

    /// Returns every diagnostic, in canonical order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns the pass counters.
    #[must_use]
    pub fn stats(&self) -> &PassStats {
        &self.stats
    }

    /// Returns true if no error was reported.
    ///
    /// Warnings count as errors if the pass was configured that way.
    #[must_use]
    pub fn is_success(&self) -> bool {
        if self.warnings_as_errors {
            self.diagnostics.is_empty()
        } else {
            self.errors().next().is_none()
        }
    }

    /// Returns diagnostics of error severity.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity() == Severity::Error)
    }

    /// Returns diagnostics of warning severity.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity() == Severity::Warning)
    }

    /// Returns diagnostics reported against one type.
    pub fn diagnostics_for<'a>(
        &'a self,
        identity: &'a TypeIdentity,
    ) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics.iter().filter(move |d| &d.identity == identity)
    }

    /// Consumes the compilation, returning the population and diagnostics.
    #[must_use]
    pub fn into_parts(self) -> (Population<Resolved>, Vec<Diagnostic>) {
        (self.population, self.diagnostics)
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// Runs resolution passes.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    config: PipelineConfig,
    cancellation: CancellationToken,
}

/// Validated definitions and diagnostics of the validation stage.
struct Validation {
    validated: Vec<ValidatedDefinition>,
    diagnostics: Vec<Diagnostic>,
    rounds: usize,
    rejected: usize,
}

impl Pipeline {
    /// Creates a pipeline with the given configuration.
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            cancellation: CancellationToken::new(),
        }
    }

    /// Builder method to observe an existing cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Returns the token that cancels passes of this pipeline.
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Runs one pass over `declarations`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration is inconsistent, or
    /// `Cancelled` if the pass was cancelled; nothing is published then.
    /// Problems in the declarations are diagnostics, never errors.
    #[instrument(skip_all, fields(declarations = declarations.len()))]
    pub fn run(&self, declarations: &[Declaration]) -> Result<Compilation> {
        self.config.validate()?;
        self.cancellation.check("processing")?;

        let (definitions, mut diagnostics) = self.process_all(declarations);
        let definition_count = definitions.len();
        self.cancellation.check("tally")?;

        let tally = DeclarationTally::from_definitions(&definitions);
        debug!(
            identities = tally.len(),
            conflicting = tally.conflicting().count(),
            "tallied definitions"
        );

        let validation = self.validate_all(definitions, &tally)?;
        diagnostics.extend(validation.diagnostics);
        self.cancellation.check("assembly")?;

        let partition: Partition<Resolved> = validation.validated.into_iter().collect();
        let population = assemble(partition, &tally);
        sort_canonically(&mut diagnostics);

        let stats = PassStats {
            declarations: declarations.len(),
            definitions: definition_count,
            rounds: validation.rounds,
            rejected: validation.rejected,
            resolved: population.len(),
        };
        debug!(?stats, diagnostics = diagnostics.len(), "pass complete");

        Ok(Compilation {
            population,
            diagnostics,
            stats,
            warnings_as_errors: self.config.warnings_as_errors,
        })
    }

    #[instrument(skip_all)]
    fn process_all(&self, declarations: &[Declaration]) -> (Vec<Definition>, Vec<Diagnostic>) {
        let options = &self.config.processor;
        let outcomes: Vec<Outcome<Definition>> = if self.config.parallel {
            declarations.par_iter().map(|d| process(d, options)).collect()
        } else {
            declarations.iter().map(|d| process(d, options)).collect()
        };

        let mut definitions = Vec::with_capacity(outcomes.len());
        let mut diagnostics = Vec::new();
        for outcome in outcomes {
            let (definition, reported) = outcome.into_parts();
            definitions.extend(definition);
            diagnostics.extend(reported);
        }

        debug!(
            definitions = definitions.len(),
            diagnostics = diagnostics.len(),
            "processed declarations"
        );
        (definitions, diagnostics)
    }

    /// Validates until a round rejects nothing.
    ///
    /// A round removes the definitions that failed with a diagnostic. Silent
    /// failures are only removed in a round with no reported failure, since
    /// they may stem from a definition rejected in the same round; the next
    /// round then reports them against the smaller snapshot.
    ///
    /// Each survivor keeps the ordinal `tally` gave it.
    #[instrument(skip_all, fields(definitions = definitions.len()))]
    fn validate_all(
        &self,
        definitions: Vec<Definition>,
        tally: &DeclarationTally,
    ) -> Result<Validation> {
        let limit = self.config.round_limit(definitions.len());
        let mut survivors: Vec<(usize, Definition)> = definitions.into_iter().enumerate().collect();
        let mut diagnostics = Vec::new();
        let mut rejected = 0;
        let mut rounds = 0;

        loop {
            self.cancellation.check("validation")?;
            rounds += 1;

            let partition: Partition<Processed> =
                survivors.iter().map(|(_, d)| d.clone()).collect();
            let snapshot = assemble(partition, tally);
            let outcomes = self.validate_round(&survivors, &snapshot);

            let reported: Vec<bool> = outcomes
                .iter()
                .map(|o| !o.is_success() && !o.diagnostics().is_empty())
                .collect();
            let any_reported = reported.iter().any(|r| *r);
            let failed: Vec<bool> = outcomes
                .iter()
                .zip(&reported)
                .map(|(o, r)| !o.is_success() && (*r || !any_reported))
                .collect();
            let failures = failed.iter().filter(|f| **f).count();

            debug!(round = rounds, survivors = survivors.len(), failures, "validation round");

            if failures == 0 || rounds >= limit {
                let mut validated = Vec::with_capacity(outcomes.len());
                for outcome in outcomes {
                    let (value, reported) = outcome.into_parts();
                    rejected += usize::from(value.is_none());
                    validated.extend(value);
                    diagnostics.extend(reported);
                }
                if failures > 0 {
                    let withheld = withhold_unsupported(&mut validated);
                    rejected += withheld;
                    warn!(rounds, failures, withheld, "validation stopped at the round limit");
                }
                return Ok(Validation {
                    validated,
                    diagnostics,
                    rounds,
                    rejected,
                });
            }

            let mut remaining = Vec::with_capacity(survivors.len() - failures);
            for ((definition, outcome), failed) in survivors.into_iter().zip(outcomes).zip(failed) {
                if failed {
                    rejected += 1;
                    diagnostics.extend(outcome.into_parts().1);
                } else {
                    remaining.push(definition);
                }
            }
            survivors = remaining;
        }
    }

    fn validate_round(
        &self,
        definitions: &[(usize, Definition)],
        snapshot: &Population<Processed>,
    ) -> Vec<Outcome<ValidatedDefinition>> {
        let validator = Validator::new(snapshot)
            .with_name_dimension_heuristics(self.config.processor.name_dimension_heuristics);
        if self.config.parallel {
            definitions
                .par_iter()
                .map(|(ordinal, d)| validator.validate(*ordinal, d))
                .collect()
        } else {
            definitions
                .iter()
                .map(|(ordinal, d)| validator.validate(*ordinal, d))
                .collect()
        }
    }
}

/// Runs one pass with the default configuration.
///
/// # Errors
///
/// See [`Pipeline::run`].
pub fn compile(declarations: &[Declaration]) -> Result<Compilation> {
    Pipeline::default().run(declarations)
}

/// Withholds definitions that require a type which is not published.
///
/// Repeats until every remaining requirement is met, then drops optional
/// references to withheld types. Returns how many were withheld.
fn withhold_unsupported(validated: &mut Vec<ValidatedDefinition>) -> usize {
    let before = validated.len();
    loop {
        let accepted: BTreeSet<TypeIdentity> =
            validated.iter().map(|v| v.identity().clone()).collect();
        let count = validated.len();
        validated.retain(|v| v.requirements().into_iter().all(|r| accepted.contains(r)));
        if validated.len() == count {
            for definition in validated.iter_mut() {
                definition.retain_references(|target| accepted.contains(target));
            }
            return before - count;
        }
    }
}
