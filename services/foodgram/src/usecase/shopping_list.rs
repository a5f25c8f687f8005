//! Shopping-list consolidation: sum ingredient amounts across every recipe
//! in a user's cart.

use crate::domain::repository::CartRepository;
use crate::domain::types::CartIngredientRow;
use crate::error::FoodgramError;
use uuid::Uuid;

/// One consolidated line of the exported shopping list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListEntry {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Sum amounts per ingredient name, keeping first-encountered order.
///
/// The measurement unit is taken from the first occurrence; ingredients
/// carry one canonical unit, so no conversion happens here.
pub fn aggregate(rows: impl IntoIterator<Item = CartIngredientRow>) -> Vec<ShoppingListEntry> {
    let mut entries: Vec<ShoppingListEntry> = Vec::new();
    for row in rows {
        match entries.iter_mut().find(|e| e.name == row.name) {
            Some(entry) => entry.amount += i64::from(row.amount),
            None => entries.push(ShoppingListEntry {
                name: row.name,
                measurement_unit: row.measurement_unit,
                amount: i64::from(row.amount),
            }),
        }
    }
    entries
}

/// Render one `"{name}: {amount} {measurement_unit}"` line per entry.
pub fn render(entries: &[ShoppingListEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{}: {} {}", e.name, e.amount, e.measurement_unit))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── DownloadShoppingList ─────────────────────────────────────────────────────

pub struct DownloadShoppingListUseCase<C: CartRepository> {
    pub cart: C,
}

impl<C: CartRepository> DownloadShoppingListUseCase<C> {
    /// Produce the plaintext shopping list for `user_id`'s cart.
    ///
    /// An empty cart is `EmptyCart` — there is nothing to export, so no
    /// output artifact is produced at all.
    pub async fn execute(&self, user_id: Uuid) -> Result<String, FoodgramError> {
        let rows = self.cart.ingredient_rows(user_id).await?;
        if rows.is_empty() {
            return Err(FoodgramError::EmptyCart);
        }
        Ok(render(&aggregate(rows)))
    }
}
