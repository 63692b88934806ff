//! Command-line surface of the `products` binary

use clap::{Args, Parser, Subcommand};
use domain_products::{ProductFilter, ProductIn, ProductUpdate};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "products")]
#[command(about = "Create, read, query, update and delete products in MongoDB")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Insert a new product
    Create {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        price: f64,

        #[arg(short, long, allow_negative_numbers = true)]
        quantity: i32,
    },

    /// Fetch one product by id
    Get { id: Uuid },

    /// List products, optionally restricted to a price range
    Query(QueryArgs),

    /// Patch the supplied fields of a product
    Update {
        id: Uuid,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        price: Option<f64>,

        #[arg(short, long, allow_negative_numbers = true)]
        quantity: Option<i32>,
    },

    /// Remove a product by id
    Delete { id: Uuid },

    /// Ping the database
    Health,
}

#[derive(Args, Debug, Default)]
pub struct QueryArgs {
    /// Only products priced strictly between 5000 and 8000
    #[arg(short, long)]
    pub filtered: bool,

    /// Exclusive lower price bound
    #[arg(long, conflicts_with = "filtered")]
    pub price_above: Option<f64>,

    /// Exclusive upper price bound
    #[arg(long, conflicts_with = "filtered")]
    pub price_below: Option<f64>,

    #[arg(short, long)]
    pub limit: Option<i64>,

    #[arg(short, long)]
    pub offset: Option<u64>,
}

impl QueryArgs {
    pub fn filter(&self) -> ProductFilter {
        let mut filter = if self.price_above.is_some() || self.price_below.is_some() {
            ProductFilter {
                price_above: self.price_above,
                price_below: self.price_below,
                ..ProductFilter::all()
            }
        } else {
            ProductFilter::from_flag(self.filtered)
        };

        if let Some(limit) = self.limit {
            filter = filter.with_limit(limit);
        }
        if let Some(offset) = self.offset {
            filter = filter.with_offset(offset);
        }
        filter
    }
}

pub fn product_in(name: String, price: f64, quantity: i32) -> ProductIn {
    ProductIn {
        name,
        price,
        quantity,
    }
}

pub fn product_update(
    name: Option<String>,
    price: Option<f64>,
    quantity: Option<i32>,
) -> ProductUpdate {
    ProductUpdate {
        name,
        price,
        quantity,
        ..Default::default()
    }
}
