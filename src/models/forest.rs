//! Random forest regressor evaluated from exported tree arrays.
//!
//! Each tree is stored the way the training library keeps it internally:
//! parallel arrays indexed by node id, with `children_left[i] == -1`
//! marking a leaf. Samples go left when `x[feature] <= threshold`.

use crate::error::{InferenceError, InferenceResult};
use crate::models::regressor::Regressor;
use serde::{Deserialize, Serialize};

const LEAF: i64 = -1;

/// One regression tree in flattened form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl RegressionTree {
    /// A single-leaf tree that always predicts `value`
    pub fn leaf(value: f64) -> Self {
        Self {
            children_left: vec![LEAF],
            children_right: vec![LEAF],
            feature: vec![-2],
            threshold: vec![-2.0],
            value: vec![value],
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.value.len()
    }

    fn is_leaf(&self, node: usize) -> bool {
        self.children_left[node] == LEAF
    }

    /// Check array shapes and node references.
    ///
    /// Children must come after their parent, which also rules out cycles.
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        let n = self.n_nodes();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [
            self.children_left.len(),
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err("tree arrays have different lengths".to_string());
        }

        for node in 0..n {
            if self.is_leaf(node) {
                if !self.value[node].is_finite() {
                    return Err(format!("leaf {} has a non-finite value", node));
                }
                continue;
            }

            for child in [self.children_left[node], self.children_right[node]] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!("node {} has invalid child {}", node, child));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature >= n_features as i64 {
                return Err(format!("node {} splits on unknown feature {}", node, feature));
            }
            if self.threshold[node].is_nan() {
                return Err(format!("node {} has a NaN threshold", node));
            }
        }

        Ok(())
    }

    /// Walk from the root to a leaf.
    ///
    /// Returns `None` when the walk leaves the arrays, reads a feature the
    /// row lacks, or fails to reach a leaf within `n_nodes` steps.
    pub fn predict(&self, features: &[f64]) -> Option<f64> {
        let mut node = 0usize;
        for _ in 0..=self.n_nodes() {
            let left = *self.children_left.get(node)?;
            if left == LEAF {
                return self.value.get(node).copied();
            }
            let feature = usize::try_from(*self.feature.get(node)?).ok()?;
            let next = if *features.get(feature)? <= *self.threshold.get(node)? {
                left
            } else {
                *self.children_right.get(node)?
            };
            node = usize::try_from(next).ok()?;
        }
        None
    }
}

/// Averaging ensemble of regression trees.
///
/// Deserialization validates the trees, so a forest that exists can be
/// walked without going out of bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ForestSpec")]
pub struct ForestRegressor {
    name: String,
    n_features: usize,
    trees: Vec<RegressionTree>,
}

fn default_name() -> String {
    "random_forest".to_string()
}

/// Unvalidated on-disk form of a forest
#[derive(Deserialize)]
struct ForestSpec {
    #[serde(default = "default_name")]
    name: String,
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl TryFrom<ForestSpec> for ForestRegressor {
    type Error = String;

    fn try_from(spec: ForestSpec) -> Result<Self, Self::Error> {
        let forest = Self {
            name: spec.name,
            n_features: spec.n_features,
            trees: spec.trees,
        };
        forest.validate()?;
        Ok(forest)
    }
}

impl ForestRegressor {
    pub fn new(n_features: usize, trees: Vec<RegressionTree>) -> Result<Self, String> {
        let forest = Self {
            name: default_name(),
            n_features,
            trees,
        };
        forest.validate()?;
        Ok(forest)
    }

    /// A forest that predicts `value` for every row
    pub fn constant(n_features: usize, value: f64) -> Result<Self, String> {
        let forest = Self {
            name: "constant".to_string(),
            n_features,
            trees: vec![RegressionTree::leaf(value)],
        };
        forest.validate()?;
        Ok(forest)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.n_features == 0 {
            return Err("forest declares zero input features".to_string());
        }
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }
}

impl Regressor for ForestRegressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn predict(&self, features: &[f64]) -> InferenceResult<f64> {
        if features.len() != self.n_features {
            return Err(InferenceError::WidthMismatch {
                stage: "model",
                expected: self.n_features,
                actual: features.len(),
            });
        }
        if features.iter().any(|v| !v.is_finite()) {
            return Err(InferenceError::NonFiniteInput("model input"));
        }

        let mut sum = 0.0;
        for (i, tree) in self.trees.iter().enumerate() {
            sum += tree.predict(features).ok_or_else(|| {
                InferenceError::Model(format!("tree {} has no valid path to a leaf", i))
            })?;
        }
        Ok(sum / self.trees.len() as f64)
    }
}
