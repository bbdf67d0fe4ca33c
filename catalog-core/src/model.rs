//! Product rows as read from the `products` table

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the `products` table.
///
/// Owned by whatever populates the store; this crate only reads it.
/// `price` is an exact decimal and goes out in JSON as a string with its
/// stored scale (`"39.90"`). `name` and `image_url` are nullable in the
/// table and come out as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
}

impl Product {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        price: Decimal,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: Some(name.into()),
            price,
            image_url: Some(image_url.into()),
        }
    }

    /// Display name, empty when the column is NULL
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

#[cfg(feature = "sqlx")]
mod mysql_row {
    use rust_decimal::Decimal;
    use sqlx::mysql::MySqlRow;
    use sqlx::{FromRow, Row};

    use super::Product;

    impl<'r> FromRow<'r, MySqlRow> for Product {
        fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
            // Signed and unsigned integer ids both decode
            let id = match row.try_get::<i64, _>("id") {
                Ok(id) => id,
                Err(_) => unsigned_id(row.try_get::<u64, _>("id")?)?,
            };

            Ok(Self {
                id,
                name: row.try_get("name")?,
                price: row.try_get::<Decimal, _>("price")?,
                image_url: row.try_get("image_url")?,
            })
        }
    }

    pub(super) fn unsigned_id(id: u64) -> Result<i64, sqlx::Error> {
        i64::try_from(id).map_err(|e| sqlx::Error::ColumnDecode {
            index: "id".to_string(),
            source: Box::new(e),
        })
    }

}
