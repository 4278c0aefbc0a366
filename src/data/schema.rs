//! Column names of the retail dataset and its data dictionary.

pub const SHIP_MODE: &str = "Ship Mode";
pub const SEGMENT: &str = "Segment";
pub const COUNTRY: &str = "Country";
pub const CITY: &str = "City";
pub const STATE: &str = "State";
pub const POSTAL_CODE: &str = "Postal Code";
pub const REGION: &str = "Region";
pub const CATEGORY: &str = "Category";
pub const SUB_CATEGORY: &str = "Sub-Category";
pub const SALES: &str = "Sales";
pub const QUANTITY: &str = "Quantity";
pub const DISCOUNT: &str = "Discount";
pub const PROFIT: &str = "Profit";

// Derived columns
pub const PRICE_PER_PRODUCT: &str = "price_per_product";
pub const PROFIT_PER_PRODUCT: &str = "profit_per_product";
pub const STATE_CODE: &str = "state_code";

/// Columns every retail CSV must provide, in file order.
pub const REQUIRED_COLUMNS: [&str; 13] = [
    SHIP_MODE,
    SEGMENT,
    COUNTRY,
    CITY,
    STATE,
    POSTAL_CODE,
    REGION,
    CATEGORY,
    SUB_CATEGORY,
    SALES,
    QUANTITY,
    DISCOUNT,
    PROFIT,
];

/// The value fields summarised per group on the insight pages.
pub const SUMMARY_FIELDS: [&str; 3] = [SALES, DISCOUNT, PROFIT];

pub const DATA_DICTIONARY: [(&str, &str); 13] = [
    (SHIP_MODE, "Mode of shipping used for shipment delivery"),
    (SEGMENT, "Customer segment product was shipped to"),
    (COUNTRY, "Country in which the shipment was delivered"),
    (CITY, "City in which shipment was delivered"),
    (STATE, "State in which the shipment was delivered"),
    (POSTAL_CODE, "Postal code the shipment was delivered to"),
    (REGION, "Country region"),
    (CATEGORY, "The category product belongs to"),
    (SUB_CATEGORY, "Sub-category of the product"),
    (SALES, "Sale made in USD"),
    (QUANTITY, "Product quantity"),
    (DISCOUNT, "Discount given on the product"),
    (PROFIT, "Profit/loss made on the sale"),
];
