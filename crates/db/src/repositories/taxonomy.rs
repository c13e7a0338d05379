//! Taxonomy repository.

use sea_orm::{EntityTrait, QueryOrder};

use gestor_core::ports::{StoreError, TaxonomySource};
use gestor_core::taxonomy::{Action, Product, StrategicAxis, Taxonomy, UsageTag, UsageTags};
use gestor_shared::types::{ActionId, PlanTypeId, ProductId, StrategicAxisId};

use super::{DbStore, json_strings, store_err};
use crate::entities::{actions, products, strategic_axes};

impl DbStore {
    /// Loads every axis, action and product, whatever their tags.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a tag column is malformed.
    pub async fn load_taxonomy(&self) -> Result<Taxonomy, StoreError> {
        let axes = strategic_axes::Entity::find()
            .order_by_asc(strategic_axes::Column::Code)
            .all(&self.db)
            .await
            .map_err(store_err)?;
        let actions = actions::Entity::find()
            .order_by_asc(actions::Column::Code)
            .all(&self.db)
            .await
            .map_err(store_err)?;
        let products = products::Entity::find()
            .order_by_asc(products::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(store_err)?;

        Ok(Taxonomy {
            strategic_axes: axes
                .into_iter()
                .map(axis_from_model)
                .collect::<Result<_, _>>()?,
            actions: actions
                .into_iter()
                .map(action_from_model)
                .collect::<Result<_, _>>()?,
            products: products
                .into_iter()
                .map(product_from_model)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl TaxonomySource for DbStore {
    async fn fetch_plan_type_elements(
        &self,
        plan_type_id: PlanTypeId,
    ) -> Result<Taxonomy, StoreError> {
        let taxonomy = self.load_taxonomy().await?.scoped(UsageTag::WorkPlan);
        if let Err(e) = taxonomy.validate() {
            tracing::warn!(
                plan_type_id = %plan_type_id,
                error = %e,
                "Work-plan taxonomy has dangling links"
            );
        }
        Ok(taxonomy)
    }
}

fn usage_tags(value: &sea_orm::prelude::Json) -> Result<UsageTags, StoreError> {
    Ok(UsageTags::from_labels(json_strings(value, "usage_tags")?))
}

pub(crate) fn axis_from_model(model: strategic_axes::Model) -> Result<StrategicAxis, StoreError> {
    Ok(StrategicAxis {
        id: StrategicAxisId::from_uuid(model.id),
        usage_tags: usage_tags(&model.usage_tags)?,
        code: model.code,
        name: model.name,
        description: model.description,
    })
}

pub(crate) fn action_from_model(model: actions::Model) -> Result<Action, StoreError> {
    Ok(Action {
        id: ActionId::from_uuid(model.id),
        usage_tags: usage_tags(&model.usage_tags)?,
        code: model.code,
        name: model.name,
        strategic_axis_id: StrategicAxisId::from_uuid(model.strategic_axis_id),
    })
}

pub(crate) fn product_from_model(model: products::Model) -> Result<Product, StoreError> {
    Ok(Product {
        id: ProductId::from_uuid(model.id),
        usage_tags: usage_tags(&model.usage_tags)?,
        name: model.name,
        action_id: ActionId::from_uuid(model.action_id),
    })
}
