// Humany API module.
// Provides the client, option bags and response types for the help-portal REST API.

pub mod client;
pub mod defaults;
pub mod endpoints;
pub mod query;
pub mod tree;
pub mod types;

pub use client::{DynamicServiceClient, ServiceClient};
pub use defaults::{Defaults, ValueProvider};
pub use query::{Expand, Query, QueryValue, build_query};
pub use tree::{find_category_by_name, find_top_ancestor};
pub use types::*;
