//! Projection of filtered records into display and export tables.
//!
//! Column configuration per category is static data in [`schema`]; the
//! [`SchemaProjector`] itself never branches on the category.

mod currency;
mod projector;
mod schema;
mod table;

pub use currency::{format_budget_amount, group_thousands};
pub use projector::{Projection, SchemaProjector};
pub use schema::{
    schema_for, AttachmentSpec, CategorySchema, FieldLabel, BUDGET_AMOUNT_FIELD,
    DETAIL_LINK_LABEL,
};
pub use table::{Attachment, Column, DisplayTable, Table};
