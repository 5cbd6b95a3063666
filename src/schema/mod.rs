mod asset;
mod column;
mod comparator;
mod foreign_key_constraint;
mod identifier;
mod index;
mod schema;
mod schema_diff;
mod schema_manager;
mod table;

pub use asset::Asset;
pub use column::{Column, ColumnData};
pub use comparator::{Comparator, GenericComparator};
pub use foreign_key_constraint::{ForeignKeyConstraint, ForeignKeyReferentialAction};
pub use identifier::{Identifier, IntoIdentifier};
pub use index::Index;
pub use schema::Schema;
pub use schema_diff::SchemaDiff;
pub use schema_manager::{SchemaManager, filter_asset_names};
pub(crate) use schema_manager::string_from_value;
pub use table::{Table, TableOptions};
