//! Index storage: string interning, columnar tables, and the persisted
//! store unit that ties them together.

pub mod store;
pub mod string_table;
pub mod table;

pub use store::{IndexStore, ref_columns, ref_index_columns, symbol_columns};
pub use string_table::StringTable;
pub use table::{Table, TableOrder};
