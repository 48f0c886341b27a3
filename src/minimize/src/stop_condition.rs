/* ************************************************************************ **
** This file is part of relax, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Exposes a serializable expression language for convergence criteria.
//!
//! ```text
//! {"grad-rms": 1e-4}
//! {"any": [{"grad-max": 1e-3}, {"all": [{"grad-norm": 1e-2}, {"grad-rms": 1e-5}]}]}
//! ```

use relax_slice_math::{vmax_abs, vnorm, vrms};

/// Generic trait for stop conditions.
pub trait ShouldStop<T> {
    fn should_stop(&self, x: &T) -> bool;
}

/// Represents logical expressions of T in JSON.
///
/// Where `(T)` stands in for a valid JSON representation of `T`,
/// the accepted forms of `LogicalExpression<T>` are as follows:
///
///  - `{"any": [(T), ...]}` - a logical-or of 0 or more expressions
///  - `{"all": [(T), ...]}` - a logical-and of 0 or more expressions
///
/// These appear untagged alongside the simple predicates in [`Cereal`],
/// so one should be cautious about adding further variants.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalExpression<T> {
    #[serde(rename = "any")]
    Any(Vec<T>),
    #[serde(rename = "all")]
    All(Vec<T>),
}

/// Type that stop condition config can deserialize directly into.
///
/// This extends a simple predicate type (represented as an object
/// with a single kv pair) with `"all"` and `"any"` variants.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Cereal<P> {
    Simple(P),
    Logical(LogicalExpression<Cereal<P>>),
}

impl<T, P: ShouldStop<T>> ShouldStop<T> for Cereal<P> {
    fn should_stop(&self, x: &T) -> bool {
        match self {
            Cereal::Simple(pred) => pred.should_stop(x),
            Cereal::Logical(LogicalExpression::Any(xs)) => xs.iter().any(|c| c.should_stop(x)),
            Cereal::Logical(LogicalExpression::All(xs)) => xs.iter().all(|c| c.should_stop(x)),
        }
    }
}

impl<P> Cereal<P> {
    /// Visit every simple predicate.
    pub fn for_each_simple(&self, f: &mut impl FnMut(&P)) {
        match self {
            Cereal::Simple(pred) => f(pred),
            Cereal::Logical(LogicalExpression::Any(xs)) |
            Cereal::Logical(LogicalExpression::All(xs)) => {
                for c in xs {
                    c.for_each_simple(&mut *f);
                }
            },
        }
    }
}

/// Measures of the force at a point, which is all a convergence criterion may look at.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Objectives {
    pub grad_max: f64,
    pub grad_norm: f64,
    pub grad_rms: f64,
}

impl Objectives {
    pub fn from_gradient(gradient: &[f64]) -> Objectives {
        Objectives {
            grad_max: vmax_abs(gradient),
            grad_norm: vnorm(gradient),
            grad_rms: vrms(gradient),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Simple {
    /// Max absolute value of grad.
    #[serde(rename = "grad-max")] GradientMax(f64),
    /// Norm of grad. (Beware, this scales with sqrt(N)...)
    #[serde(rename = "grad-norm")] GradientNorm(f64),
    /// Norm of grad, rescaled as an intensive property.
    #[serde(rename = "grad-rms")] GradientRms(f64),
}

impl Simple {
    pub fn tolerance(&self) -> f64 {
        match *self {
            Simple::GradientMax(tol) |
            Simple::GradientNorm(tol) |
            Simple::GradientRms(tol) => tol,
        }
    }
}

impl ShouldStop<Objectives> for Simple {
    fn should_stop(&self, objs: &Objectives) -> bool {
        match *self {
            Simple::GradientMax(tol) => objs.grad_max <= tol,
            Simple::GradientNorm(tol) => objs.grad_norm <= tol,
            Simple::GradientRms(tol) => objs.grad_rms <= tol,
        }
    }
}

/// Configuration for the built-in convergence criteria.
///
/// The recommended method for constructing one of these is to deserialize it from JSON.  The
/// set of basic conditions is documented in `#[serde]` annotations on [`Simple`]; they may be
/// combined with `"all"` and `"any"`.  Note `{"any": []}` never holds.
pub type StopCondition = Cereal<Simple>;

impl StopCondition {
    pub fn grad_rms(tol: f64) -> Self { Cereal::Simple(Simple::GradientRms(tol)) }
    pub fn grad_max(tol: f64) -> Self { Cereal::Simple(Simple::GradientMax(tol)) }
    pub fn grad_norm(tol: f64) -> Self { Cereal::Simple(Simple::GradientNorm(tol)) }

    /// Test the criterion against a gradient.
    pub fn is_satisfied_by(&self, gradient: &[f64]) -> bool {
        self.should_stop(&Objectives::from_gradient(gradient))
    }

    /// The first tolerance that is negative or NaN, if any.
    pub fn invalid_tolerance(&self) -> Option<f64> {
        let mut bad = None;
        self.for_each_simple(&mut |pred| {
            let tol = pred.tolerance();
            if bad.is_none() && !(tol >= 0.0) {
                bad = Some(tol);
            }
        });
        bad
    }
}
