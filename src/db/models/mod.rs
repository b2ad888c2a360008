//! Database Models
//!
//! Documents are stored with camelCase field names matching the wire format,
//! so a single serde representation serves both the database and the API.

pub mod order;
pub mod product;
pub mod serde_thing;
pub mod user;

pub use order::{LineItem, LineItemDraft, Order, OrderCreate, OrderDraft, OrderStatus};
pub use product::{Product, ProductDraft, ScentNotes, stocks_have_units};
pub use user::{User, UserCreate, UserRole};
