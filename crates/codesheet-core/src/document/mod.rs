//! Document state and cell location (UI-agnostic).

mod locate;
mod state;

pub use locate::{
    cell_collection, find_cell, property_key_text, table_flag, CellHandle, CELLS_BINDING,
    TABLE_FLAG_KEY, VALUE_KEY,
};
pub use state::Document;
