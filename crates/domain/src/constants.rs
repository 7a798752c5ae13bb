//! Service constants
//!
//! Names shared between the services and their persistence layout.

/// Collection holding catalog items
pub const CATALOG_COLLECTION: &str = "items";
/// Collection holding inventory rows
pub const INVENTORY_COLLECTION: &str = "inventoryitems";

/// Route on the catalog service that lists every item
pub const CATALOG_ITEMS_ROUTE: &str = "items";

pub const CATALOG_SERVICE_NAME: &str = "catalog";
pub const INVENTORY_SERVICE_NAME: &str = "inventory";

pub const DEFAULT_CATALOG_BIND_ADDR: &str = "127.0.0.1:5001";
pub const DEFAULT_INVENTORY_BIND_ADDR: &str = "127.0.0.1:5005";
pub const DEFAULT_CATALOG_URL: &str = "http://localhost:5001";

pub const DEFAULT_POOL_SIZE: u32 = 4;
