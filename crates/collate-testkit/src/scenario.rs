//! Scripted scenarios with expected outcomes.
//!
//! A scenario is a list of steps, each a read or a write with the outcome
//! every correct store must produce. Running the same script against every
//! backend keeps their behaviour identical.

use std::fmt;

use collate_store::{PutResult, Store};

use crate::fixtures::{key, token};

/// One step of a scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Put {
        key: &'static str,
        value: &'static str,
        credential: &'static str,
        expect: PutResult,
    },
    Get {
        key: &'static str,
        expect: Option<&'static str>,
    },
}

impl Step {
    pub const fn put(
        key: &'static str,
        value: &'static str,
        credential: &'static str,
        expect: PutResult,
    ) -> Self {
        Step::Put {
            key,
            value,
            credential,
            expect,
        }
    }

    pub const fn get(key: &'static str, expect: Option<&'static str>) -> Self {
        Step::Get { key, expect }
    }
}

/// A step whose observed outcome differed from the expected one.
#[derive(Debug, Clone)]
pub struct StepFailure {
    pub index: usize,
    pub step: Step,
    pub observed: String,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {} {:?}: observed {}",
            self.index, self.step, self.observed
        )
    }
}

impl std::error::Error for StepFailure {}

/// The claim / deny / update walkthrough every store must reproduce.
pub fn reference_scenario() -> Vec<Step> {
    vec![
        Step::put("alpha", "hello", "h1", PutResult::Created),
        Step::get("alpha", Some("hello")),
        Step::put("alpha", "world", "wrong", PutResult::Denied),
        Step::get("alpha", Some("hello")),
        Step::put("alpha", "world", "h1", PutResult::Updated),
        Step::get("alpha", Some("world")),
        Step::get("beta", None),
    ]
}

/// Repeated authorised writes of the same value, and ownership isolation
/// between keys.
pub fn ownership_scenario() -> Vec<Step> {
    vec![
        Step::put("alpha", "v", "h1", PutResult::Created),
        Step::put("alpha", "v", "h1", PutResult::Updated),
        Step::put("alpha", "v", "h1", PutResult::Updated),
        Step::get("alpha", Some("v")),
        // Owning one key grants nothing on another.
        Step::put("beta", "b", "h2", PutResult::Created),
        Step::put("beta", "stolen", "h1", PutResult::Denied),
        Step::put("alpha", "stolen", "h2", PutResult::Denied),
        Step::get("alpha", Some("v")),
        Step::get("beta", Some("b")),
        // Token comparison is exact.
        Step::put("alpha", "x", "H1", PutResult::Denied),
        Step::put("alpha", "x", "h1 ", PutResult::Denied),
        Step::get("alpha", Some("v")),
    ]
}

/// Run `steps` in order against `store`, stopping at the first mismatch.
pub async fn run_scenario<S: Store + ?Sized>(store: &S, steps: &[Step]) -> Result<(), StepFailure> {
    for (index, step) in steps.iter().enumerate() {
        let fail = |observed: String| StepFailure {
            index,
            step: step.clone(),
            observed,
        };

        match *step {
            Step::Put {
                key: k,
                value,
                credential,
                expect,
            } => {
                let result = store
                    .put(&key(k), value, &token(credential))
                    .await
                    .map_err(|e| fail(format!("error: {}", e)))?;
                if result != expect {
                    return Err(fail(format!("{:?}", result)));
                }
            }
            Step::Get { key: k, expect } => {
                let value = store
                    .get(&key(k))
                    .await
                    .map_err(|e| fail(format!("error: {}", e)))?;
                if value.as_deref() != expect {
                    return Err(fail(format!("{:?}", value)));
                }
            }
        }
    }
    Ok(())
}
