pub mod frame;
pub mod header;
pub mod period;
pub mod reference;
pub mod workbook;

pub use frame::{
    any_to_string, column_value, column_values, is_present_text,
    set_string_column,
};
pub use header::{detect_header_row, grid_to_frame, load_table};
pub use period::detect_period;
pub use reference::{
    MacroRule, RosterPairs, load_fixture_table, load_macro_rules, load_roster_pairs,
    normalize_channel,
};
pub use workbook::{
    SheetGrid, Workbook, cell_to_string, find_sheet, format_numeric, open_workbook,
    read_all_sheets, read_sheet, sheet_names,
};
