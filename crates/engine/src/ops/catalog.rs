use std::collections::HashMap;

use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    EngineError, Exercise, NewExercise, NewStorefrontItem, ResultEngine, StorefrontItem,
    exercises, storefront,
    util::{normalize_exercise_name, parse_uuid},
};

use super::{Engine, with_tx};

/// Resolves an exercise name against the library.
///
/// Exact normalized match first, then a library name containing the input,
/// then the input containing a library name. Among substring candidates the
/// longest library name wins.
pub(super) async fn match_exercise<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> ResultEngine<Option<Uuid>> {
    let normalized = normalize_exercise_name(name);
    if normalized.is_empty() {
        return Ok(None);
    }

    let exact = exercises::Entity::find()
        .filter(exercises::Column::NormalizedName.eq(normalized.as_str()))
        .one(db)
        .await?;
    if let Some(model) = exact {
        return parse_uuid(&model.id, "exercise").map(Some);
    }

    let partial = exercises::Entity::find()
        .filter(
            exercises::Column::NormalizedName
                .contains(normalized.as_str())
                .or(Expr::cust_with_values(
                    "? LIKE '%' || normalized_name || '%'",
                    [normalized.as_str()],
                )),
        )
        .order_by_desc(Expr::cust("LENGTH(normalized_name)"))
        .order_by_asc(exercises::Column::NormalizedName)
        .one(db)
        .await?;
    partial
        .map(|model| parse_uuid(&model.id, "exercise"))
        .transpose()
}

/// Resolves every distinct name once. Unmatched names map to `None`.
pub(super) async fn match_exercises<'a, C: ConnectionTrait>(
    db: &C,
    names: impl IntoIterator<Item = &'a str>,
) -> ResultEngine<HashMap<String, Option<Uuid>>> {
    let mut matches = HashMap::new();
    for name in names {
        if !matches.contains_key(name) {
            let matched = match_exercise(db, name).await?;
            matches.insert(name.to_string(), matched);
        }
    }
    Ok(matches)
}

impl Engine {
    /// Add an exercise to the library. Names are unique after normalization.
    pub async fn add_exercise(&self, cmd: NewExercise) -> ResultEngine<Exercise> {
        let exercise = Exercise::new(&cmd.name, cmd.body_region)?;
        with_tx!(self, |db_tx| {
            let exists = exercises::Entity::find()
                .filter(exercises::Column::NormalizedName.eq(exercise.normalized_name.as_str()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::Conflict(format!(
                    "exercise '{}' already exists",
                    exercise.name
                )));
            }
            let model: exercises::ActiveModel = (&exercise).into();
            model.insert(&db_tx).await?;
            Ok(exercise)
        })
    }

    pub async fn exercises(&self) -> ResultEngine<Vec<Exercise>> {
        exercises::Entity::find()
            .order_by_asc(exercises::Column::NormalizedName)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Exercise::try_from)
            .collect()
    }

    /// Library id matching `name`, if any.
    pub async fn find_exercise(&self, name: &str) -> ResultEngine<Option<Uuid>> {
        match_exercise(&self.database, name).await
    }

    pub async fn add_storefront_item(&self, cmd: NewStorefrontItem) -> ResultEngine<StorefrontItem> {
        let item = StorefrontItem::new(&cmd.name, cmd.sessions, cmd.price)?;
        let model: storefront::ActiveModel = (&item).into();
        model.insert(&self.database).await?;
        tracing::info!(item = %item.id, name = %item.name, "storefront item added");
        Ok(item)
    }

    /// Active storefront packages, by name.
    pub async fn storefront_items(&self) -> ResultEngine<Vec<StorefrontItem>> {
        storefront::Entity::find()
            .filter(storefront::Column::Active.eq(true))
            .order_by_asc(storefront::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(StorefrontItem::try_from)
            .collect()
    }
}
