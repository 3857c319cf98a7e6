//! Linear expressions over model variables
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A constant plus a weighted sum of variables
#[derive(Clone, Debug, PartialEq)]
pub struct LinExpr<V> {
    constant: f64,
    terms: Vec<(f64, V)>,
}

impl<V> Default for LinExpr<V> {
    fn default() -> Self {
        LinExpr {
            constant: 0.0,
            terms: vec![],
        }
    }
}

impl<V> LinExpr<V> {
    /// The empty expression, equal to 0
    pub fn new() -> Self {
        Self::default()
    }

    /// An expression without variables
    pub fn from_constant(constant: f64) -> Self {
        LinExpr {
            constant,
            terms: vec![],
        }
    }

    /// `coefficient * var`
    pub fn term(coefficient: f64, var: V) -> Self {
        LinExpr {
            constant: 0.0,
            terms: vec![(coefficient, var)],
        }
    }

    /// The constant offset
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// The weighted variables, in insertion order
    pub fn terms(&self) -> &[(f64, V)] {
        &self.terms
    }

    /// Whether the expression has no variable terms
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// Multiply every coefficient and the constant by `factor`
    pub fn scale(mut self, factor: f64) -> Self {
        self.constant *= factor;
        for (coefficient, _) in self.terms.iter_mut() {
            *coefficient *= factor;
        }
        self
    }

    /// Evaluate the expression, looking up each variable with `value_of`
    pub fn value<F, E>(&self, mut value_of: F) -> Result<f64, E>
    where
        F: FnMut(&V) -> Result<f64, E>,
    {
        let mut total = self.constant;
        for (coefficient, var) in &self.terms {
            total += coefficient * value_of(var)?;
        }
        Ok(total)
    }
}

impl<V: PartialEq> LinExpr<V> {
    /// Merge terms on the same variable and drop zero coefficients
    pub fn simplify(self) -> Self {
        let mut terms: Vec<(f64, V)> = Vec::with_capacity(self.terms.len());
        for (coefficient, var) in self.terms {
            match terms.iter_mut().find(|(_, v)| *v == var) {
                Some((c, _)) => *c += coefficient,
                None => terms.push((coefficient, var)),
            }
        }
        terms.retain(|(c, _)| *c != 0.0);
        LinExpr {
            constant: self.constant,
            terms,
        }
    }
}

impl<V> From<V> for LinExpr<V> {
    fn from(var: V) -> Self {
        LinExpr::term(1.0, var)
    }
}

impl<V> Add for LinExpr<V> {
    type Output = LinExpr<V>;

    fn add(mut self, rhs: LinExpr<V>) -> LinExpr<V> {
        self.constant += rhs.constant;
        self.terms.extend(rhs.terms);
        self
    }
}

impl<V> Sub for LinExpr<V> {
    type Output = LinExpr<V>;

    fn sub(self, rhs: LinExpr<V>) -> LinExpr<V> {
        self + (-rhs)
    }
}

impl<V> Neg for LinExpr<V> {
    type Output = LinExpr<V>;

    fn neg(self) -> LinExpr<V> {
        self.scale(-1.0)
    }
}

impl<V> Mul<f64> for LinExpr<V> {
    type Output = LinExpr<V>;

    fn mul(self, rhs: f64) -> LinExpr<V> {
        self.scale(rhs)
    }
}

impl<V> Div<f64> for LinExpr<V> {
    type Output = LinExpr<V>;

    fn div(self, rhs: f64) -> LinExpr<V> {
        self.scale(1.0 / rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::LinExpr;

    #[test]
    fn simplify_merges_terms() {
        let e = LinExpr::term(2.0, 'x') + LinExpr::term(3.0, 'y') - LinExpr::term(2.0, 'x');
        let e = (e + LinExpr::from_constant(4.0)).simplify();
        assert_eq!(e.terms(), &[(3.0, 'y')]);
        assert_eq!(e.constant(), 4.0);
    }

    #[test]
    fn value_uses_lookup() {
        let e = (LinExpr::from('a') * 2.0 - LinExpr::from('b')) / 2.0 + LinExpr::from_constant(1.0);
        let v: Result<f64, ()> = e.value(|c| Ok(if *c == 'a' { 3.0 } else { 4.0 }));
        assert_eq!(v, Ok(2.0));
    }
}
