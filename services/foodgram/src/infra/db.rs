use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionError,
    TransactionTrait,
    sea_query::{Expr, Query, extension::postgres::PgExpr},
};
use uuid::Uuid;

use foodgram_domain::pagination::PageRequest;
use foodgram_schema::{
    auth_tokens, cart_items, favorites, ingredients, recipe_ingredients, recipe_tags, recipes,
    subscriptions, tags, users,
};

use crate::domain::repository::{
    CartRepository, FavoriteRepository, IngredientRepository, RecipeRepository,
    SubscriptionRepository, TagRepository, TokenRepository, UserRepository,
};
use crate::domain::types::{
    AuthToken, CartIngredientRow, Ingredient, IngredientAmount, IngredientEntry, Recipe,
    RecipeDetails, RecipeFields, RecipeFilter, Tag, User,
};
use crate::error::FoodgramError;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn flatten_txn_err(err: TransactionError<DbErr>) -> DbErr {
    match err {
        TransactionError::Connection(e) => e,
        TransactionError::Transaction(e) => e,
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, FoodgramError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, FoodgramError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, FoodgramError> {
        let page = page.clamped();
        let models = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .offset(page.offset())
            .limit(page.limit as u64)
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn create(&self, user: &User) -> Result<(), FoodgramError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            username: Set(user.username.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            avatar: Set(user.avatar.clone()),
            password_hash: Set(user.password_hash.clone()),
            created_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(FoodgramError::EmailTaken),
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn update_profile(
        &self,
        id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), FoodgramError> {
        users::ActiveModel {
            id: Set(id),
            first_name: Set(first_name.to_owned()),
            last_name: Set(last_name.to_owned()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update user profile")?;
        Ok(())
    }

    async fn set_avatar(&self, id: Uuid, avatar: Option<&str>) -> Result<(), FoodgramError> {
        users::ActiveModel {
            id: Set(id),
            avatar: Set(avatar.map(str::to_owned)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set user avatar")?;
        Ok(())
    }

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<(), FoodgramError> {
        users::ActiveModel {
            id: Set(id),
            password_hash: Set(hash.to_owned()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set user password hash")?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        username: model.username,
        first_name: model.first_name,
        last_name: model.last_name,
        avatar: model.avatar,
        password_hash: model.password_hash,
        created_at: model.created_at,
    }
}

// ── Token repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTokenRepository {
    pub db: DatabaseConnection,
}

impl TokenRepository for DbTokenRepository {
    async fn find_user_by_key(&self, key: &str) -> Result<Option<User>, FoodgramError> {
        let pair = auth_tokens::Entity::find_by_id(key)
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .context("find user by token key")?;
        Ok(pair.and_then(|(_, user)| user).map(user_from_model))
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<AuthToken>, FoodgramError> {
        let model = auth_tokens::Entity::find()
            .filter(auth_tokens::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find token by user")?;
        Ok(model.map(|m| AuthToken {
            key: m.key,
            user_id: m.user_id,
            created_at: m.created_at,
        }))
    }

    async fn create(&self, token: &AuthToken) -> Result<(), FoodgramError> {
        auth_tokens::ActiveModel {
            key: Set(token.key.clone()),
            user_id: Set(token.user_id),
            created_at: Set(token.created_at),
        }
        .insert(&self.db)
        .await
        .context("create token")?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, FoodgramError> {
        let result = auth_tokens::Entity::delete_many()
            .filter(auth_tokens::Column::Key.eq(key))
            .exec(&self.db)
            .await
            .context("delete token")?;
        Ok(result.rows_affected > 0)
    }
}

// ── Subscription repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSubscriptionRepository {
    pub db: DatabaseConnection,
}

impl SubscriptionRepository for DbSubscriptionRepository {
    async fn exists(&self, subscriber: Uuid, author: Uuid) -> Result<bool, FoodgramError> {
        let model = subscriptions::Entity::find_by_id((subscriber, author))
            .one(&self.db)
            .await
            .context("find subscription")?;
        Ok(model.is_some())
    }

    async fn create(&self, subscriber: Uuid, author: Uuid) -> Result<(), FoodgramError> {
        let result = subscriptions::ActiveModel {
            subscriber_id: Set(subscriber),
            author_id: Set(author),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(FoodgramError::AlreadySubscribed),
            Err(e) => Err(anyhow::Error::new(e).context("create subscription").into()),
        }
    }

    async fn delete(&self, subscriber: Uuid, author: Uuid) -> Result<bool, FoodgramError> {
        let result = subscriptions::Entity::delete_many()
            .filter(subscriptions::Column::SubscriberId.eq(subscriber))
            .filter(subscriptions::Column::AuthorId.eq(author))
            .exec(&self.db)
            .await
            .context("delete subscription")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_authors(
        &self,
        subscriber: Uuid,
        page: PageRequest,
    ) -> Result<Vec<User>, FoodgramError> {
        let page = page.clamped();
        let rows = subscriptions::Entity::find()
            .filter(subscriptions::Column::SubscriberId.eq(subscriber))
            .order_by_asc(subscriptions::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit as u64)
            .all(&self.db)
            .await
            .context("list subscribed authors")?;
        let author_ids: Vec<Uuid> = rows.iter().map(|row| row.author_id).collect();
        users_in_order(&self.db, &author_ids).await
    }
}

/// Fetch users by id, preserving the order of `ids`.
async fn users_in_order(
    db: &DatabaseConnection,
    ids: &[Uuid],
) -> Result<Vec<User>, FoodgramError> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let models = users::Entity::find()
        .filter(users::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await
        .context("fetch users by ids")?;
    let mut by_id: std::collections::HashMap<Uuid, users::Model> =
        models.into_iter().map(|m| (m.id, m)).collect();
    Ok(ids
        .iter()
        .filter_map(|id| by_id.remove(id))
        .map(user_from_model)
        .collect())
}

// ── Favorite repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFavoriteRepository {
    pub db: DatabaseConnection,
}

impl FavoriteRepository for DbFavoriteRepository {
    async fn exists(&self, user: Uuid, recipe: i32) -> Result<bool, FoodgramError> {
        let model = favorites::Entity::find_by_id((user, recipe))
            .one(&self.db)
            .await
            .context("find favorite")?;
        Ok(model.is_some())
    }

    async fn create(&self, user: Uuid, recipe: i32) -> Result<(), FoodgramError> {
        let result = favorites::ActiveModel {
            user_id: Set(user),
            recipe_id: Set(recipe),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(FoodgramError::AlreadyFavorited),
            Err(e) => Err(anyhow::Error::new(e).context("create favorite").into()),
        }
    }

    async fn delete(&self, user: Uuid, recipe: i32) -> Result<bool, FoodgramError> {
        let result = favorites::Entity::delete_many()
            .filter(favorites::Column::UserId.eq(user))
            .filter(favorites::Column::RecipeId.eq(recipe))
            .exec(&self.db)
            .await
            .context("delete favorite")?;
        Ok(result.rows_affected > 0)
    }

    async fn member_recipe_ids(
        &self,
        user: Uuid,
        recipes: &[i32],
    ) -> Result<Vec<i32>, FoodgramError> {
        let rows = favorites::Entity::find()
            .filter(favorites::Column::UserId.eq(user))
            .filter(favorites::Column::RecipeId.is_in(recipes.iter().copied()))
            .all(&self.db)
            .await
            .context("list favorites by recipe ids")?;
        Ok(rows.into_iter().map(|row| row.recipe_id).collect())
    }
}

// ── Cart repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCartRepository {
    pub db: DatabaseConnection,
}

impl CartRepository for DbCartRepository {
    async fn exists(&self, user: Uuid, recipe: i32) -> Result<bool, FoodgramError> {
        let model = cart_items::Entity::find_by_id((user, recipe))
            .one(&self.db)
            .await
            .context("find cart item")?;
        Ok(model.is_some())
    }

    async fn create(&self, user: Uuid, recipe: i32) -> Result<(), FoodgramError> {
        let result = cart_items::ActiveModel {
            user_id: Set(user),
            recipe_id: Set(recipe),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(FoodgramError::AlreadyInCart),
            Err(e) => Err(anyhow::Error::new(e).context("create cart item").into()),
        }
    }

    async fn delete(&self, user: Uuid, recipe: i32) -> Result<bool, FoodgramError> {
        let result = cart_items::Entity::delete_many()
            .filter(cart_items::Column::UserId.eq(user))
            .filter(cart_items::Column::RecipeId.eq(recipe))
            .exec(&self.db)
            .await
            .context("delete cart item")?;
        Ok(result.rows_affected > 0)
    }

    async fn member_recipe_ids(
        &self,
        user: Uuid,
        recipes: &[i32],
    ) -> Result<Vec<i32>, FoodgramError> {
        let rows = cart_items::Entity::find()
            .filter(cart_items::Column::UserId.eq(user))
            .filter(cart_items::Column::RecipeId.is_in(recipes.iter().copied()))
            .all(&self.db)
            .await
            .context("list cart items by recipe ids")?;
        Ok(rows.into_iter().map(|row| row.recipe_id).collect())
    }

    async fn ingredient_rows(&self, user: Uuid) -> Result<Vec<CartIngredientRow>, FoodgramError> {
        use sea_orm::{FromQueryResult, Statement};

        // Join-row id order is insertion order; the shopping-list
        // aggregation keys its output order off it.
        let sql = r#"
            SELECT i.name, i.measurement_unit, ri.amount
            FROM cart_items ci
            JOIN recipe_ingredients ri ON ri.recipe_id = ci.recipe_id
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ci.user_id = $1
            ORDER BY ri.id
        "#;

        #[derive(Debug, FromQueryResult)]
        struct Row {
            name: String,
            measurement_unit: String,
            amount: i32,
        }

        let rows = Row::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            sql,
            [user.into()],
        ))
        .all(&self.db)
        .await
        .context("list cart ingredient rows")?;

        Ok(rows
            .into_iter()
            .map(|row| CartIngredientRow {
                name: row.name,
                measurement_unit: row.measurement_unit,
                amount: row.amount,
            })
            .collect())
    }
}

// ── Recipe repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecipeRepository {
    pub db: DatabaseConnection,
}

impl RecipeRepository for DbRecipeRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, FoodgramError> {
        let model = recipes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find recipe by id")?;
        Ok(model.map(recipe_from_model))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Recipe>, FoodgramError> {
        let model = recipes::Entity::find()
            .filter(recipes::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .context("find recipe by slug")?;
        Ok(model.map(recipe_from_model))
    }

    async fn details(&self, id: i32) -> Result<Option<RecipeDetails>, FoodgramError> {
        let pair = recipes::Entity::find_by_id(id)
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .context("find recipe with author")?;
        let Some((model, author)) = pair else {
            return Ok(None);
        };
        let author = author.ok_or_else(|| anyhow::anyhow!("recipe {id} has no author row"))?;
        let details = assemble_details(&self.db, model, author).await?;
        Ok(Some(details))
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Vec<RecipeDetails>, FoodgramError> {
        let page = page.clamped();
        let mut query = recipes::Entity::find().find_also_related(users::Entity);
        if let Some(author) = filter.author {
            query = query.filter(recipes::Column::AuthorId.eq(author));
        }
        if !filter.tag_slugs.is_empty() {
            let sub = Query::select()
                .column(recipe_tags::Column::RecipeId)
                .from(recipe_tags::Entity)
                .inner_join(
                    tags::Entity,
                    Expr::col((tags::Entity, tags::Column::Id))
                        .equals((recipe_tags::Entity, recipe_tags::Column::TagId)),
                )
                .and_where(
                    Expr::col((tags::Entity, tags::Column::Slug))
                        .is_in(filter.tag_slugs.clone()),
                )
                .to_owned();
            query = query.filter(recipes::Column::Id.in_subquery(sub));
        }
        if let Some(user) = filter.favorited_by {
            let sub = Query::select()
                .column(favorites::Column::RecipeId)
                .from(favorites::Entity)
                .and_where(Expr::col(favorites::Column::UserId).eq(user))
                .to_owned();
            query = query.filter(recipes::Column::Id.in_subquery(sub));
        }
        if let Some(user) = filter.in_cart_of {
            let sub = Query::select()
                .column(cart_items::Column::RecipeId)
                .from(cart_items::Entity)
                .and_where(Expr::col(cart_items::Column::UserId).eq(user))
                .to_owned();
            query = query.filter(recipes::Column::Id.in_subquery(sub));
        }

        let pairs = query
            .order_by_desc(recipes::Column::CreatedAt)
            .order_by_desc(recipes::Column::Id)
            .offset(page.offset())
            .limit(page.limit as u64)
            .all(&self.db)
            .await
            .context("list recipes")?;

        let mut results = Vec::with_capacity(pairs.len());
        for (model, author) in pairs {
            let id = model.id;
            let author =
                author.ok_or_else(|| anyhow::anyhow!("recipe {id} has no author row"))?;
            results.push(assemble_details(&self.db, model, author).await?);
        }
        Ok(results)
    }

    async fn list_by_author(
        &self,
        author: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<Recipe>, FoodgramError> {
        let mut query = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author))
            .order_by_desc(recipes::Column::CreatedAt)
            .order_by_desc(recipes::Column::Id);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        let models = query.all(&self.db).await.context("list recipes by author")?;
        Ok(models.into_iter().map(recipe_from_model).collect())
    }

    async fn count_by_author(&self, author: Uuid) -> Result<u64, FoodgramError> {
        let count = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author))
            .count(&self.db)
            .await
            .context("count recipes by author")?;
        Ok(count)
    }

    async fn create(
        &self,
        author: Uuid,
        fields: &RecipeFields,
        slug: &str,
        tag_ids: &[i32],
        ingredients: &[IngredientEntry],
    ) -> Result<Option<i32>, FoodgramError> {
        let fields = fields.clone();
        let slug = slug.to_owned();
        let tag_ids = tag_ids.to_vec();
        let ingredients = ingredients.to_vec();
        let result = self
            .db
            .transaction::<_, i32, DbErr>(|txn| {
                Box::pin(async move {
                    let model = recipes::ActiveModel {
                        author_id: Set(author),
                        name: Set(fields.name.clone()),
                        text: Set(fields.text.clone()),
                        cooking_time: Set(fields.cooking_time),
                        image: Set(fields.image.clone()),
                        slug: Set(slug),
                        created_at: Set(Utc::now()),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    insert_join_rows(txn, model.id, &tag_ids, &ingredients).await?;
                    Ok(model.id)
                })
            })
            .await;
        match result {
            Ok(id) => Ok(Some(id)),
            Err(err) => {
                let err = flatten_txn_err(err);
                if is_unique_violation(&err) {
                    // Slug collision; the caller regenerates and retries.
                    Ok(None)
                } else {
                    Err(anyhow::Error::new(err).context("create recipe").into())
                }
            }
        }
    }

    async fn update(
        &self,
        id: i32,
        fields: &RecipeFields,
        tag_ids: &[i32],
        ingredients: &[IngredientEntry],
    ) -> Result<(), FoodgramError> {
        let fields = fields.clone();
        let tag_ids = tag_ids.to_vec();
        let ingredients = ingredients.to_vec();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    recipes::ActiveModel {
                        id: Set(id),
                        name: Set(fields.name.clone()),
                        text: Set(fields.text.clone()),
                        cooking_time: Set(fields.cooking_time),
                        image: Set(fields.image.clone()),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;

                    // Replace both join-row sets wholesale.
                    recipe_tags::Entity::delete_many()
                        .filter(recipe_tags::Column::RecipeId.eq(id))
                        .exec(txn)
                        .await?;
                    recipe_ingredients::Entity::delete_many()
                        .filter(recipe_ingredients::Column::RecipeId.eq(id))
                        .exec(txn)
                        .await?;
                    insert_join_rows(txn, id, &tag_ids, &ingredients).await?;
                    Ok(())
                })
            })
            .await
            .map_err(flatten_txn_err)
            .context("update recipe")?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<bool, FoodgramError> {
        let result = recipes::Entity::delete_many()
            .filter(recipes::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("delete recipe")?;
        Ok(result.rows_affected > 0)
    }
}

fn recipe_from_model(model: recipes::Model) -> Recipe {
    Recipe {
        id: model.id,
        author_id: model.author_id,
        name: model.name,
        text: model.text,
        cooking_time: model.cooking_time,
        image: model.image,
        slug: model.slug,
        created_at: model.created_at,
    }
}

async fn insert_join_rows<C: ConnectionTrait>(
    conn: &C,
    recipe_id: i32,
    tag_ids: &[i32],
    ingredients: &[IngredientEntry],
) -> Result<(), DbErr> {
    for tag_id in tag_ids {
        recipe_tags::ActiveModel {
            recipe_id: Set(recipe_id),
            tag_id: Set(*tag_id),
        }
        .insert(conn)
        .await?;
    }
    for entry in ingredients {
        recipe_ingredients::ActiveModel {
            recipe_id: Set(recipe_id),
            ingredient_id: Set(entry.id),
            amount: Set(entry.amount),
            ..Default::default()
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

/// Load the joined tags and ingredient amounts of one recipe.
async fn assemble_details(
    db: &DatabaseConnection,
    model: recipes::Model,
    author: users::Model,
) -> Result<RecipeDetails, FoodgramError> {
    let tag_rows = recipe_tags::Entity::find()
        .filter(recipe_tags::Column::RecipeId.eq(model.id))
        .find_also_related(tags::Entity)
        .all(db)
        .await
        .context("list recipe tags")?;
    let mut recipe_tags_list = Vec::with_capacity(tag_rows.len());
    for (row, tag) in tag_rows {
        let tag = tag.ok_or_else(|| {
            anyhow::anyhow!("recipe tag row ({}, {}) has no tag", row.recipe_id, row.tag_id)
        })?;
        recipe_tags_list.push(Tag {
            id: tag.id,
            name: tag.name,
            slug: tag.slug,
        });
    }

    let ingredient_rows = recipe_ingredients::Entity::find()
        .filter(recipe_ingredients::Column::RecipeId.eq(model.id))
        .order_by_asc(recipe_ingredients::Column::Id)
        .find_also_related(ingredients::Entity)
        .all(db)
        .await
        .context("list recipe ingredients")?;
    let mut amounts = Vec::with_capacity(ingredient_rows.len());
    for (row, ingredient) in ingredient_rows {
        let ingredient = ingredient.ok_or_else(|| {
            anyhow::anyhow!("recipe ingredient row {} has no ingredient", row.id)
        })?;
        amounts.push(IngredientAmount {
            ingredient: Ingredient {
                id: ingredient.id,
                name: ingredient.name,
                measurement_unit: ingredient.measurement_unit,
            },
            amount: row.amount,
        });
    }

    Ok(RecipeDetails {
        recipe: recipe_from_model(model),
        author: user_from_model(author),
        tags: recipe_tags_list,
        ingredients: amounts,
    })
}

// ── Tag repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTagRepository {
    pub db: DatabaseConnection,
}

impl TagRepository for DbTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, FoodgramError> {
        let models = tags::Entity::find()
            .order_by_asc(tags::Column::Id)
            .all(&self.db)
            .await
            .context("list tags")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, FoodgramError> {
        let model = tags::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find tag by id")?;
        Ok(model.map(tag_from_model))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Tag>, FoodgramError> {
        let models = tags::Entity::find()
            .filter(tags::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find tags by ids")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }
}

fn tag_from_model(model: tags::Model) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
        slug: model.slug,
    }
}

// ── Ingredient repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIngredientRepository {
    pub db: DatabaseConnection,
}

/// ILIKE pattern matching `name` anywhere in the ingredient name, with LIKE
/// metacharacters in the needle escaped.
fn contains_pattern(name: &str) -> String {
    format!("%{}%", name.replace('%', "\\%").replace('_', "\\_"))
}

impl IngredientRepository for DbIngredientRepository {
    async fn search(&self, name: Option<&str>) -> Result<Vec<Ingredient>, FoodgramError> {
        let mut query = ingredients::Entity::find();
        if let Some(name) = name {
            query = query.filter(Expr::col(ingredients::Column::Name).ilike(contains_pattern(name)));
        }
        let models = query
            .order_by_asc(ingredients::Column::Name)
            .all(&self.db)
            .await
            .context("search ingredients")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, FoodgramError> {
        let model = ingredients::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find ingredient by id")?;
        Ok(model.map(ingredient_from_model))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Ingredient>, FoodgramError> {
        let models = ingredients::Entity::find()
            .filter(ingredients::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find ingredients by ids")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }
}

fn ingredient_from_model(model: ingredients::Model) -> Ingredient {
    Ingredient {
        id: model.id,
        name: model.name,
        measurement_unit: model.measurement_unit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_match_needle_anywhere_in_name() {
        // "salt" must match "sea salt", not only names starting with it.
        assert_eq!(contains_pattern("salt"), "%salt%");
    }

    #[test]
    fn should_escape_like_metacharacters() {
        assert_eq!(contains_pattern("100%_whole"), "%100\\%\\_whole%");
    }
}
