use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};

/// Lower exclusive bound of the built-in price band used by `query(true)`
pub const DEFAULT_PRICE_ABOVE: f64 = 5000.0;
/// Upper exclusive bound of the built-in price band used by `query(true)`
pub const DEFAULT_PRICE_BELOW: f64 = 8000.0;

/// Product document as stored in the `products` collection
///
/// The identifier is kept in an explicit `id` field; MongoDB's `_id` is
/// generated by the driver and never read back. Timestamps are stored as BSON
/// dates, so they carry millisecond precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    #[serde(with = "bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Current time at the precision a BSON date can hold
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// `DateTime<Utc>` <-> BSON date
pub(crate) mod bson_datetime {
    use chrono::{DateTime, Utc};
    use mongodb::bson;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};

    pub fn to_bson(dt: &DateTime<Utc>) -> bson::DateTime {
        bson::DateTime::from_millis(dt.timestamp_millis())
    }

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        to_bson(dt).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let millis = bson::DateTime::deserialize(deserializer)?.timestamp_millis();
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| D::Error::custom(format!("date out of range: {}ms", millis)))
    }
}

/// Creation payload
///
/// Name and price are taken as given; only quantity carries a rule, checked
/// by the usecase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductIn {
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}

/// Full product view returned by create, get and query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductOut {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Merge-patch payload: only `Some` fields are written
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    /// Filled with the current time by the usecase when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Full product view returned by update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdateOut {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Selection and pagination for queries
///
/// Price bounds are exclusive. `None` leaves that side open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub price_above: Option<f64>,
    pub price_below: Option<f64>,
    pub limit: Option<i64>,
    pub offset: Option<u64>,
}

impl Product {
    /// Build a new document from the creation payload, stamping id and timestamps
    pub fn new(input: ProductIn) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            price: input.price,
            quantity: input.quantity,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the present fields of `update`, leaving the others untouched
    pub fn apply_update(&mut self, update: &ProductUpdate) {
        if let Some(ref name) = update.name {
            self.name = name.clone();
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(updated_at) = update.updated_at {
            self.updated_at = updated_at;
        }
    }
}

impl From<Product> for ProductOut {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            quantity: product.quantity,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl From<Product> for ProductUpdateOut {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            quantity: product.quantity,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl ProductFilter {
    /// Every product, unpaginated
    pub fn all() -> Self {
        Self::default()
    }

    /// Products strictly between 5000 and 8000
    pub fn default_price_band() -> Self {
        Self::price_between(DEFAULT_PRICE_ABOVE, DEFAULT_PRICE_BELOW)
    }

    /// Products with `above < price < below`
    pub fn price_between(above: f64, below: f64) -> Self {
        Self {
            price_above: Some(above),
            price_below: Some(below),
            ..Self::default()
        }
    }

    /// `true` selects the default price band, `false` everything
    pub fn from_flag(apply_filter: bool) -> Self {
        if apply_filter {
            Self::default_price_band()
        } else {
            Self::all()
        }
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Whether `product` satisfies the price predicate (pagination ignored)
    pub fn matches(&self, product: &Product) -> bool {
        self.price_above.is_none_or(|above| product.price > above)
            && self.price_below.is_none_or(|below| product.price < below)
    }

    /// Reject empty price ranges and non-positive limits
    pub fn check(&self) -> ProductResult<()> {
        if let (Some(above), Some(below)) = (self.price_above, self.price_below) {
            if above >= below {
                return Err(ProductError::Validation(format!(
                    "price range is empty: {} >= {}",
                    above, below
                )));
            }
        }
        if let Some(limit) = self.limit {
            if limit <= 0 {
                return Err(ProductError::Validation(format!(
                    "limit must be positive, got {}",
                    limit
                )));
            }
        }
        Ok(())
    }
}
