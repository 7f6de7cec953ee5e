//! Domain layer for the bakery ordering backend.
//!
//! This crate provides:
//! - The `Order` aggregate and its line-entry quantity rules
//! - `Customer` and `Product` catalog entities
//! - A document-backed `Repository` with optimistic concurrency
//! - Services that load, mutate and persist entities

pub mod customer;
pub mod error;
pub mod order;
pub mod product;
pub mod repository;

pub use customer::{Customer, CustomerError, CustomerService};
pub use error::DomainError;
pub use order::{
    AddLine, FulfillOrder, LineEntry, Order, OrderError, OrderService, ProductId, Quantity,
    RemoveLine, SubtractLine,
};
pub use product::{Product, ProductError, ProductService};
pub use repository::{Entity, Loaded, Repository};
