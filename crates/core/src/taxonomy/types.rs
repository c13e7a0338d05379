//! Taxonomy domain types.

use std::collections::BTreeSet;
use std::fmt;

use gestor_shared::types::{ActionId, ProductId, StrategicAxisId};
use serde::{Deserialize, Serialize};

use super::error::TaxonomyError;

/// Functional module a taxonomy element applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageTag {
    /// Work plans.
    WorkPlan,
    /// Report templates.
    ReportTemplate,
    /// Internationalization module.
    Internationalization,
}

impl UsageTag {
    /// Returns the storage label of the tag.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WorkPlan => "work_plan",
            Self::ReportTemplate => "report_template",
            Self::Internationalization => "internationalization",
        }
    }

    /// Parses a tag from its storage label.
    pub fn parse(s: &str) -> Result<Self, TaxonomyError> {
        match s.trim().to_lowercase().as_str() {
            "work_plan" => Ok(Self::WorkPlan),
            "report_template" => Ok(Self::ReportTemplate),
            "internationalization" => Ok(Self::Internationalization),
            other => Err(TaxonomyError::UnknownUsageTag(other.to_string())),
        }
    }
}

impl fmt::Display for UsageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of usage tags carried by a taxonomy element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageTags(BTreeSet<UsageTag>);

impl UsageTags {
    /// Builds a set from tags.
    pub fn new(tags: impl IntoIterator<Item = UsageTag>) -> Self {
        Self(tags.into_iter().collect())
    }

    /// Builds a set from storage labels.
    ///
    /// Unknown labels are skipped with a warning; they come from data
    /// maintained outside this crate.
    pub fn from_labels<S: AsRef<str>>(labels: impl IntoIterator<Item = S>) -> Self {
        let mut tags = BTreeSet::new();
        for label in labels {
            match UsageTag::parse(label.as_ref()) {
                Ok(tag) => {
                    tags.insert(tag);
                }
                Err(e) => tracing::warn!(error = %e, "ignoring usage tag"),
            }
        }
        Self(tags)
    }

    /// Returns true if the set contains the tag.
    #[must_use]
    pub fn contains(&self, tag: UsageTag) -> bool {
        self.0.contains(&tag)
    }

    /// Adds a tag.
    pub fn insert(&mut self, tag: UsageTag) {
        self.0.insert(tag);
    }

    /// Iterates the tags in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = UsageTag> + '_ {
        self.0.iter().copied()
    }

    /// Storage labels of the tags.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.iter().map(|t| t.as_str().to_string()).collect()
    }

    /// Returns true if no tag is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Level of the three-level taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomyLevel {
    /// Strategic axis (root).
    StrategicAxis,
    /// Action (middle).
    Action,
    /// Product (leaf).
    Product,
}

impl TaxonomyLevel {
    /// Returns the string representation of the level.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrategicAxis => "strategic_axis",
            Self::Action => "action",
            Self::Product => "product",
        }
    }
}

impl fmt::Display for TaxonomyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root of the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategicAxis {
    /// Axis ID.
    pub id: StrategicAxisId,
    /// Institutional code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Modules this axis applies to.
    pub usage_tags: UsageTags,
}

/// Action under a strategic axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Action ID.
    pub id: ActionId,
    /// Institutional code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Parent axis.
    pub strategic_axis_id: StrategicAxisId,
    /// Modules this action applies to.
    pub usage_tags: UsageTags,
}

/// Product under an action; the unit of hours and progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Parent action.
    pub action_id: ActionId,
    /// Modules this product applies to.
    pub usage_tags: UsageTags,
}

/// Fully resolved path from axis to product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyPath {
    /// Root.
    pub strategic_axis: StrategicAxis,
    /// Middle.
    pub action: Action,
    /// Leaf.
    pub product: Product,
}

/// Embedded taxonomy joins as returned by the store.
///
/// Any level may be missing when the underlying join is null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyLinks {
    /// Joined product.
    pub product: Option<Product>,
    /// Joined action of the product.
    pub action: Option<Action>,
    /// Joined axis of the action.
    pub strategic_axis: Option<StrategicAxis>,
}

impl TaxonomyLinks {
    /// Links with every level resolved.
    #[must_use]
    pub fn resolved(path: TaxonomyPath) -> Self {
        Self {
            product: Some(path.product),
            action: Some(path.action),
            strategic_axis: Some(path.strategic_axis),
        }
    }

    /// Returns the three levels, or the first level that is missing
    /// (product first, then action, then axis).
    pub fn resolve(&self) -> Result<(&StrategicAxis, &Action, &Product), TaxonomyLevel> {
        let product = self.product.as_ref().ok_or(TaxonomyLevel::Product)?;
        let action = self.action.as_ref().ok_or(TaxonomyLevel::Action)?;
        let axis = self
            .strategic_axis
            .as_ref()
            .ok_or(TaxonomyLevel::StrategicAxis)?;
        Ok((axis, action, product))
    }
}

/// Loaded taxonomy elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    /// All strategic axes.
    pub strategic_axes: Vec<StrategicAxis>,
    /// All actions.
    pub actions: Vec<Action>,
    /// All products.
    pub products: Vec<Product>,
}

impl Taxonomy {
    /// Keeps only the elements tagged with `tag`, level by level.
    #[must_use]
    pub fn scoped(&self, tag: UsageTag) -> Self {
        Self {
            strategic_axes: self
                .strategic_axes
                .iter()
                .filter(|a| a.usage_tags.contains(tag))
                .cloned()
                .collect(),
            actions: self
                .actions
                .iter()
                .filter(|a| a.usage_tags.contains(tag))
                .cloned()
                .collect(),
            products: self
                .products
                .iter()
                .filter(|p| p.usage_tags.contains(tag))
                .cloned()
                .collect(),
        }
    }

    /// Finds a strategic axis.
    #[must_use]
    pub fn strategic_axis(&self, id: StrategicAxisId) -> Option<&StrategicAxis> {
        self.strategic_axes.iter().find(|a| a.id == id)
    }

    /// Finds an action.
    #[must_use]
    pub fn action(&self, id: ActionId) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// Finds a product.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Actions whose axis is among `axes`, in taxonomy order.
    #[must_use]
    pub fn actions_for_axes(&self, axes: &[StrategicAxisId]) -> Vec<&Action> {
        self.actions
            .iter()
            .filter(|a| axes.contains(&a.strategic_axis_id))
            .collect()
    }

    /// Products whose action is among `actions`, in taxonomy order.
    #[must_use]
    pub fn products_for_actions(&self, actions: &[ActionId]) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| actions.contains(&p.action_id))
            .collect()
    }

    /// Joins a product with its parents, leaving missing levels empty.
    #[must_use]
    pub fn links_for(&self, product_id: ProductId) -> TaxonomyLinks {
        let product = self.product(product_id).cloned();
        let action = product
            .as_ref()
            .and_then(|p| self.action(p.action_id))
            .cloned();
        let strategic_axis = action
            .as_ref()
            .and_then(|a| self.strategic_axis(a.strategic_axis_id))
            .cloned();
        TaxonomyLinks {
            product,
            action,
            strategic_axis,
        }
    }

    /// Resolves the full path of a product.
    #[must_use]
    pub fn path_for_product(&self, product_id: ProductId) -> Option<TaxonomyPath> {
        let links = self.links_for(product_id);
        match links {
            TaxonomyLinks {
                product: Some(product),
                action: Some(action),
                strategic_axis: Some(strategic_axis),
            } => Some(TaxonomyPath {
                strategic_axis,
                action,
                product,
            }),
            _ => None,
        }
    }

    /// Checks that every action and product points at a loaded parent.
    pub fn validate(&self) -> Result<(), TaxonomyError> {
        for action in &self.actions {
            if self.strategic_axis(action.strategic_axis_id).is_none() {
                return Err(TaxonomyError::DanglingAction {
                    action_id: action.id,
                    strategic_axis_id: action.strategic_axis_id,
                });
            }
        }
        for product in &self.products {
            if self.action(product.action_id).is_none() {
                return Err(TaxonomyError::DanglingProduct {
                    product_id: product.id,
                    action_id: product.action_id,
                });
            }
        }
        Ok(())
    }
}
