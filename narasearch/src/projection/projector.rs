//! Category-agnostic projection of raw records into tables.

use std::collections::HashSet;

use tracing::debug;

use super::currency::format_budget_amount;
use super::schema::{schema_for, CategorySchema, BUDGET_AMOUNT_FIELD, DETAIL_LINK_LABEL};
use super::table::{Column, DisplayTable, Table};
use crate::core::{field_text, Category, RawRecord};

/// The two sibling views of a filtered result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    /// On-screen table.
    pub display: DisplayTable,
    /// Flat table for export.
    pub export: Table,
}

/// Projects records into display and export tables using a [`CategorySchema`].
#[derive(Debug, Clone, Copy)]
pub struct SchemaProjector {
    schema: &'static CategorySchema,
}

impl SchemaProjector {
    /// Creates a projector for a category.
    #[must_use]
    pub fn new(category: Category) -> Self {
        Self {
            schema: schema_for(category),
        }
    }

    /// Returns the schema in use.
    #[must_use]
    pub const fn schema(&self) -> &'static CategorySchema {
        self.schema
    }

    /// Projects records, preserving their order.
    ///
    /// Only configured fields that occur in at least one record become
    /// columns. The display table always carries a hidden `상세링크` column.
    #[must_use]
    pub fn project(&self, records: &[RawRecord]) -> Projection {
        let present: HashSet<&str> = records
            .iter()
            .flat_map(|r| r.keys().map(String::as_str))
            .collect();

        let display = self.display_table(records, &present);
        let export = self.export_table(records, &present);
        let display_columns = display.table().columns().len();
        let export_columns = export.columns().len();
        debug!(
            category = %self.schema.category,
            rows = records.len(),
            display_columns,
            export_columns,
            "records projected"
        );

        Projection { display, export }
    }

    fn display_table(&self, records: &[RawRecord], present: &HashSet<&str>) -> DisplayTable {
        let schema = self.schema;

        let mut columns: Vec<Column> = schema
            .display
            .iter()
            .filter(|(key, _)| present.contains(key))
            .map(|(key, label)| Column::new(*key, *label))
            .collect();

        let link_source = schema.detail_link_field.filter(|f| present.contains(f));
        columns.push(Column::hidden(
            link_source.unwrap_or(DETAIL_LINK_LABEL),
            DETAIL_LINK_LABEL,
        ));

        let attachment_fields: Vec<String> = schema
            .attachments
            .fields()
            .map(|(_, field)| field)
            .filter(|field| present.contains(field.as_str()))
            .collect();
        columns.extend(
            attachment_fields
                .iter()
                .map(|field| Column::hidden(field.clone(), field.clone())),
        );

        let mut table = Table::new(columns);
        for record in records {
            let row = table
                .columns()
                .iter()
                .map(|col| {
                    if col.label == DETAIL_LINK_LABEL {
                        link_source.map(|f| field_text(record, f)).unwrap_or_default()
                    } else if col.key == BUDGET_AMOUNT_FIELD {
                        format_budget_amount(&field_text(record, &col.key))
                    } else {
                        field_text(record, &col.key)
                    }
                })
                .collect();
            table.push_row(row);
        }

        DisplayTable::new(table, schema.attachments)
    }

    fn export_table(&self, records: &[RawRecord], present: &HashSet<&str>) -> Table {
        let columns = self
            .schema
            .export
            .iter()
            .filter(|(key, _)| present.contains(key))
            .map(|(key, label)| Column::new(*key, *label))
            .collect();

        let mut table = Table::new(columns);
        for record in records {
            let row = table
                .columns()
                .iter()
                .map(|col| field_text(record, &col.key))
                .collect();
            table.push_row(row);
        }
        table
    }
}
