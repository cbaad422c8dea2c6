/// Element ids the host page must provide.
/// Missing optional elements are skipped when wiring and rendering.
pub const FORM_ID: &str = "create-point";
pub const ITEMS_ID: &str = "items";
pub const REGION_SELECT_ID: &str = "uf";
pub const SUB_REGION_SELECT_ID: &str = "city";
pub const MAP_ID: &str = "map";
pub const SUBMIT_ID: &str = "submit";
pub const RETRY_ID: &str = "retry";
/// Status lines next to each control.
pub const ITEMS_STATUS_ID: &str = "items-status";
pub const REGION_STATUS_ID: &str = "uf-status";
pub const SUB_REGION_STATUS_ID: &str = "city-status";
pub const LOCATION_STATUS_ID: &str = "location-status";
pub const SUBMIT_STATUS_ID: &str = "submit-status";
/// Class applied to chosen item tiles.
pub const SELECTED_CLASS: &str = "selected";
