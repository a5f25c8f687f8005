//! Subscription relation: subscribe / unsubscribe / listings.

use uuid::Uuid;

use foodgram_domain::pagination::PageRequest;

use crate::domain::repository::{RecipeRepository, SubscriptionRepository, UserRepository};
use crate::domain::types::{AuthorCard, User};
use crate::error::FoodgramError;

async fn author_card<R: RecipeRepository>(
    recipes: &R,
    author: User,
    recipes_limit: Option<u64>,
) -> Result<AuthorCard, FoodgramError> {
    let listed = recipes.list_by_author(author.id, recipes_limit).await?;
    let count = recipes.count_by_author(author.id).await?;
    Ok(AuthorCard {
        author,
        recipes: listed,
        recipes_count: count,
    })
}

// ── Subscribe ────────────────────────────────────────────────────────────────

pub struct SubscribeUseCase<U: UserRepository, S: SubscriptionRepository, R: RecipeRepository> {
    pub users: U,
    pub subscriptions: S,
    pub recipes: R,
}

impl<U: UserRepository, S: SubscriptionRepository, R: RecipeRepository> SubscribeUseCase<U, S, R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        author_id: Uuid,
        recipes_limit: Option<u64>,
    ) -> Result<AuthorCard, FoodgramError> {
        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or(FoodgramError::UserNotFound)?;
        if user_id == author_id {
            return Err(FoodgramError::SelfSubscription);
        }
        // Fast-path check; the store's unique constraint settles races.
        if self.subscriptions.exists(user_id, author_id).await? {
            return Err(FoodgramError::AlreadySubscribed);
        }
        self.subscriptions.create(user_id, author_id).await?;
        author_card(&self.recipes, author, recipes_limit).await
    }
}

// ── Unsubscribe ──────────────────────────────────────────────────────────────

pub struct UnsubscribeUseCase<U: UserRepository, S: SubscriptionRepository> {
    pub users: U,
    pub subscriptions: S,
}

impl<U: UserRepository, S: SubscriptionRepository> UnsubscribeUseCase<U, S> {
    pub async fn execute(&self, user_id: Uuid, author_id: Uuid) -> Result<(), FoodgramError> {
        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(FoodgramError::UserNotFound);
        }
        if user_id == author_id {
            return Err(FoodgramError::SelfSubscription);
        }
        let deleted = self.subscriptions.delete(user_id, author_id).await?;
        if !deleted {
            return Err(FoodgramError::NotSubscribed);
        }
        Ok(())
    }
}

// ── ListSubscriptions ────────────────────────────────────────────────────────

pub struct ListSubscriptionsUseCase<S: SubscriptionRepository, R: RecipeRepository> {
    pub subscriptions: S,
    pub recipes: R,
}

impl<S: SubscriptionRepository, R: RecipeRepository> ListSubscriptionsUseCase<S, R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        page: PageRequest,
        recipes_limit: Option<u64>,
    ) -> Result<Vec<AuthorCard>, FoodgramError> {
        let authors = self.subscriptions.list_authors(user_id, page).await?;
        let mut cards = Vec::with_capacity(authors.len());
        for author in authors {
            cards.push(author_card(&self.recipes, author, recipes_limit).await?);
        }
        Ok(cards)
    }
}
