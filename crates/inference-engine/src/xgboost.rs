//! XGBoost JSON Model Runtime
//!
//! Evaluates gradient-boosted regression trees saved with
//! `Booster.save_model("model.json")`. Only the parts of the schema needed
//! for inference are read; everything else is ignored.

use crate::InferenceError;
use ndarray::{ArrayView1, ArrayView2};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// Serialized schema
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ModelDocument {
    learner: LearnerDocument,
    #[serde(default)]
    version: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct LearnerDocument {
    #[serde(default)]
    attributes: LearnerAttributes,
    learner_model_param: LearnerModelParam,
    objective: ObjectiveDocument,
    gradient_booster: BoosterDocument,
}

/// Set by early stopping; prediction stops at `best_iteration`
#[derive(Debug, Default, Deserialize)]
struct LearnerAttributes {
    #[serde(default)]
    best_iteration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LearnerModelParam {
    base_score: String,
    num_feature: String,
    #[serde(default)]
    num_class: Option<String>,
    #[serde(default)]
    num_target: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectiveDocument {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "name")]
enum BoosterDocument {
    #[serde(rename = "gbtree")]
    GbTree { model: GbTreeModel },
    #[serde(rename = "dart")]
    Dart {
        gbtree: GbTreeBooster,
        weight_drop: Vec<f32>,
    },
}

#[derive(Debug, Deserialize)]
struct GbTreeBooster {
    model: GbTreeModel,
}

#[derive(Debug, Deserialize)]
struct GbTreeModel {
    #[serde(default)]
    gbtree_model_param: Option<GbTreeModelParam>,
    /// Tree offsets per boosting round (XGBoost >= 2.0)
    #[serde(default)]
    iteration_indptr: Option<Vec<usize>>,
    trees: Vec<TreeDocument>,
}

#[derive(Debug, Deserialize)]
struct GbTreeModelParam {
    #[serde(default)]
    num_parallel_tree: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TreeDocument {
    left_children: Vec<i64>,
    right_children: Vec<i64>,
    split_indices: Vec<i64>,
    split_conditions: Vec<f32>,
    default_left: Vec<Flag>,
    #[serde(default)]
    split_type: Vec<u8>,
}

/// Older models write booleans, newer ones 0/1
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(u8),
}

impl Flag {
    fn is_set(self) -> bool {
        match self {
            Flag::Bool(b) => b,
            Flag::Int(i) => i != 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Runtime representation
// ---------------------------------------------------------------------------

/// Link function applied to the summed margin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    /// Raw margin is the prediction
    Identity,
    /// Sigmoid of the margin
    Logistic,
    /// Exponential of the margin
    Exp,
}

impl Objective {
    /// Map an XGBoost objective name to its link
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "reg:squarederror"
            | "reg:squaredlogerror"
            | "reg:pseudohubererror"
            | "reg:absoluteerror"
            | "reg:quantileerror"
            | "reg:linear"
            | "binary:logitraw" => Some(Objective::Identity),
            "reg:logistic" | "binary:logistic" => Some(Objective::Logistic),
            "count:poisson" | "reg:gamma" | "reg:tweedie" => Some(Objective::Exp),
            _ => None,
        }
    }

    /// Convert `base_score` into margin space
    fn base_margin(self, base_score: f32) -> f32 {
        match self {
            Objective::Identity => base_score,
            Objective::Logistic => -(1.0 / base_score - 1.0).ln(),
            Objective::Exp => base_score.ln(),
        }
    }

    /// Convert a margin into the prediction
    fn transform(self, margin: f32) -> f32 {
        match self {
            Objective::Identity => margin,
            Objective::Logistic => 1.0 / (1.0 + (-margin).exp()),
            Objective::Exp => margin.exp(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Leaf(f32),
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
        default_left: bool,
    },
}

/// One regression tree, nodes in XGBoost order (root at 0)
#[derive(Debug, Clone)]
struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    fn from_document(
        doc: &TreeDocument,
        tree_id: usize,
        num_feature: usize,
    ) -> Result<Self, InferenceError> {
        let n = doc.left_children.len();
        let invalid =
            |msg: String| InferenceError::ModelLoadError(format!("tree {}: {}", tree_id, msg));

        if n == 0 {
            return Err(invalid("tree has no nodes".to_string()));
        }
        if doc.right_children.len() != n
            || doc.split_indices.len() != n
            || doc.split_conditions.len() != n
            || doc.default_left.len() != n
        {
            return Err(invalid("node arrays have inconsistent lengths".to_string()));
        }
        if doc.split_type.iter().any(|&t| t != 0) {
            return Err(invalid("categorical splits are not supported".to_string()));
        }

        let mut nodes = Vec::with_capacity(n);
        for nid in 0..n {
            let left = doc.left_children[nid];
            let right = doc.right_children[nid];

            if left == -1 {
                nodes.push(Node::Leaf(doc.split_conditions[nid]));
                continue;
            }

            // Children are always appended after their parent
            let child = |c: i64| -> Result<usize, InferenceError> {
                if c <= nid as i64 || c >= n as i64 {
                    Err(invalid(format!("node {} has invalid child {}", nid, c)))
                } else {
                    Ok(c as usize)
                }
            };
            let left = child(left)?;
            let right = child(right)?;

            let feature = doc.split_indices[nid];
            if feature < 0 || feature as usize >= num_feature {
                return Err(invalid(format!(
                    "node {} splits on feature {} but model has {} features",
                    nid, feature, num_feature
                )));
            }

            nodes.push(Node::Split {
                feature: feature as usize,
                threshold: doc.split_conditions[nid],
                left,
                right,
                default_left: doc.default_left[nid].is_set(),
            });
        }

        Ok(Self { nodes })
    }

    fn leaf_value(&self, row: &ArrayView1<f32>) -> f32 {
        let mut nid = 0;
        loop {
            match self.nodes[nid] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let fvalue = row[feature];
                    nid = if fvalue.is_nan() {
                        if default_left {
                            left
                        } else {
                            right
                        }
                    } else if fvalue < threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

/// Pre-trained gradient-boosted tree regressor
#[derive(Debug, Clone)]
pub struct GradientBoostedModel {
    trees: Vec<RegressionTree>,
    /// Per-tree weights (all 1.0 unless the booster is dart)
    tree_weights: Vec<f32>,
    num_feature: usize,
    objective: Objective,
    objective_name: String,
    base_score: f32,
    base_margin: f32,
    best_iteration: Option<usize>,
}

impl GradientBoostedModel {
    /// Load a model from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => InferenceError::ModelNotFound(path.to_path_buf()),
            _ => InferenceError::ModelLoadError(format!("{}: {}", path.display(), e)),
        })?;

        let model = Self::from_json_str(&text)?;
        info!(
            "Loaded model from {}: {} trees, {} features, objective {}",
            path.display(),
            model.num_trees(),
            model.num_feature,
            model.objective_name
        );
        Ok(model)
    }

    /// Parse a model from JSON text
    pub fn from_json_str(text: &str) -> Result<Self, InferenceError> {
        let doc: ModelDocument = serde_json::from_str(text)
            .map_err(|e| InferenceError::ModelLoadError(format!("malformed model JSON: {}", e)))?;

        debug!("Model document version {:?}", doc.version);

        let learner = doc.learner;
        let param = &learner.learner_model_param;

        let num_feature = parse_param::<usize>("num_feature", &param.num_feature)?;
        if num_feature == 0 {
            return Err(InferenceError::ModelLoadError("model has no features".to_string()));
        }
        if let Some(num_class) = &param.num_class {
            if parse_param::<usize>("num_class", num_class)? > 0 {
                return Err(InferenceError::ModelLoadError(
                    "multi-class models are not supported".to_string(),
                ));
            }
        }
        if let Some(num_target) = &param.num_target {
            if parse_param::<usize>("num_target", num_target)? > 1 {
                return Err(InferenceError::ModelLoadError(
                    "multi-target models are not supported".to_string(),
                ));
            }
        }

        let objective_name = learner.objective.name.clone();
        let objective = Objective::from_name(&objective_name).ok_or_else(|| {
            InferenceError::ModelLoadError(format!("unsupported objective '{}'", objective_name))
        })?;

        let base_score = parse_base_score(&param.base_score)?;
        let base_margin = objective.base_margin(base_score);
        if !base_margin.is_finite() {
            return Err(InferenceError::ModelLoadError(format!(
                "base_score {} is out of range for objective '{}'",
                base_score, objective_name
            )));
        }

        let best_iteration = learner
            .attributes
            .best_iteration
            .as_deref()
            .map(|raw| parse_param::<usize>("best_iteration", raw))
            .transpose()?;

        let (tree_model, weights) = match learner.gradient_booster {
            BoosterDocument::GbTree { model } => (model, None),
            BoosterDocument::Dart {
                gbtree,
                weight_drop,
            } => (gbtree.model, Some(weight_drop)),
        };

        let mut trees = tree_model
            .trees
            .iter()
            .enumerate()
            .map(|(id, doc)| RegressionTree::from_document(doc, id, num_feature))
            .collect::<Result<Vec<_>, _>>()?;

        let mut tree_weights = match weights {
            Some(w) if w.len() != trees.len() => {
                return Err(InferenceError::ModelLoadError(format!(
                    "dart booster has {} weights for {} trees",
                    w.len(),
                    trees.len()
                )));
            }
            Some(w) => w,
            None => vec![1.0; trees.len()],
        };

        // Early-stopped models predict with rounds 0..=best_iteration only
        if let Some(best) = best_iteration {
            let parallel = tree_model
                .gbtree_model_param
                .as_ref()
                .and_then(|p| p.num_parallel_tree.as_deref());
            let limit = tree_limit(tree_model.iteration_indptr.as_deref(), parallel, best)?;
            if limit < trees.len() {
                info!(
                    "best_iteration={}: using the first {} of {} trees",
                    best,
                    limit,
                    trees.len()
                );
                trees.truncate(limit);
                tree_weights.truncate(limit);
            }
        }

        Ok(Self {
            trees,
            tree_weights,
            num_feature,
            objective,
            objective_name,
            base_score,
            base_margin,
            best_iteration,
        })
    }

    /// Number of input features
    pub fn num_feature(&self) -> usize {
        self.num_feature
    }

    /// Early-stopping round recorded in the model, if any
    pub fn best_iteration(&self) -> Option<usize> {
        self.best_iteration
    }

    /// Number of trees used for prediction
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// XGBoost objective name
    pub fn objective_name(&self) -> &str {
        &self.objective_name
    }

    /// Link function
    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Global bias in prediction space
    pub fn base_score(&self) -> f32 {
        self.base_score
    }

    /// Predict one value per row
    pub fn predict(&self, rows: ArrayView2<f32>) -> Result<Vec<f32>, InferenceError> {
        if rows.ncols() != self.num_feature {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("(n, {})", self.num_feature),
                actual: format!("{:?}", rows.shape()),
            });
        }

        Ok(rows.outer_iter().map(|row| self.predict_row(&row)).collect())
    }

    fn predict_row(&self, row: &ArrayView1<f32>) -> f32 {
        let margin = self
            .trees
            .iter()
            .zip(self.tree_weights.iter())
            .fold(self.base_margin, |acc, (tree, &w)| acc + w * tree.leaf_value(row));
        self.objective.transform(margin)
    }
}

fn parse_param<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, InferenceError> {
    value.trim().parse::<T>().map_err(|_| {
        InferenceError::ModelLoadError(format!("invalid {} '{}'", name, value))
    })
}

/// Number of leading trees covering boosting rounds `0..=best_iteration`
fn tree_limit(
    iteration_indptr: Option<&[usize]>,
    num_parallel_tree: Option<&str>,
    best_iteration: usize,
) -> Result<usize, InferenceError> {
    let rounds = best_iteration.saturating_add(1);
    if let Some(&end) = iteration_indptr.and_then(|indptr| indptr.get(rounds)) {
        return Ok(end);
    }

    let parallel = match num_parallel_tree {
        Some(raw) => parse_param::<usize>("num_parallel_tree", raw)?.max(1),
        None => 1,
    };
    Ok(rounds.saturating_mul(parallel))
}

/// `base_score` is "5E-1" in older models and "[5E-1]" in newer ones
fn parse_base_score(raw: &str) -> Result<f32, InferenceError> {
    let inner = raw.trim().trim_start_matches('[').trim_end_matches(']');
    let first = inner.split(',').next().unwrap_or("");
    parse_param::<f32>("base_score", first)
}
