//! Response checker port

use eavesdrop_domain::{
    response::ResponseSpec,
    testing::{Assertion, TestResults},
};

/// Port for evaluating assertions against a response.
///
/// Evaluation needs XML parsing, which lives in the
/// infrastructure layer.
pub trait ResponseChecker: Send + Sync {
    /// Runs every assertion against the response, in order.
    ///
    /// Assertions arrive with their variables already resolved.
    fn check(&self, assertions: &[Assertion], response: &ResponseSpec) -> TestResults;
}
