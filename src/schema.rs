/// Column-name constants for the sales dataset and the views derived from it.
/// Single source of truth for the generator, the loader and the aggregations.

// ── Order file columns (in file order) ─────────────────────────────────────
pub mod order {
    pub const ORDER_ID: &str = "OrderID";
    pub const DATE: &str = "Date";
    pub const MONTH: &str = "Month";
    pub const QUARTER: &str = "Quarter";
    pub const YEAR: &str = "Year";
    pub const CATEGORY: &str = "Category";
    pub const PRODUCT: &str = "Product";
    pub const UNIT_PRICE: &str = "UnitPrice";
    pub const QUANTITY: &str = "Quantity";
    pub const DISCOUNT: &str = "Discount";
    pub const REVENUE: &str = "Revenue";
    pub const PROFIT: &str = "Profit";
    pub const REGION: &str = "Region";
    pub const CITY: &str = "City";
    pub const CHANNEL: &str = "Channel";
    pub const PAYMENT_METHOD: &str = "PaymentMethod";
    pub const RATING: &str = "Rating";
    pub const RETURNED: &str = "Returned";

    pub const ALL: [&str; 18] = [
        ORDER_ID,
        DATE,
        MONTH,
        QUARTER,
        YEAR,
        CATEGORY,
        PRODUCT,
        UNIT_PRICE,
        QUANTITY,
        DISCOUNT,
        REVENUE,
        PROFIT,
        REGION,
        CITY,
        CHANNEL,
        PAYMENT_METHOD,
        RATING,
        RETURNED,
    ];

    /// Columns the pipeline cannot run without.
    pub const REQUIRED: [&str; 16] = [
        ORDER_ID,
        DATE,
        YEAR,
        CATEGORY,
        PRODUCT,
        UNIT_PRICE,
        QUANTITY,
        DISCOUNT,
        REVENUE,
        PROFIT,
        REGION,
        CITY,
        CHANNEL,
        PAYMENT_METHOD,
        RATING,
        RETURNED,
    ];

    pub const FLOAT_COLUMNS: [&str; 4] = [UNIT_PRICE, REVENUE, PROFIT, RATING];
    pub const INT_COLUMNS: [&str; 4] = [YEAR, QUANTITY, DISCOUNT, RETURNED];
}

// ── Columns derived from Date at load time ─────────────────────────────────
pub mod derived {
    pub const MONTH_NUM: &str = "MonthNum";
    pub const DAY_OF_WEEK: &str = "DayOfWeek";
    pub const WEEK_NUM: &str = "WeekNum";
}

// ── Measure and key names produced by the views ────────────────────────────
pub mod measure {
    pub const REVENUE: &str = "Revenue";
    pub const PROFIT: &str = "Profit";
    pub const ORDERS: &str = "Orders";
    pub const AVG_ORDER: &str = "AvgOrder";
    pub const AVG_REVENUE: &str = "AvgRevenue";
    pub const METHOD: &str = "Method";
    pub const COUNT: &str = "Count";
    pub const TOTAL_ORDERS: &str = "TotalOrders";
    pub const RETURNS: &str = "Returns";
    pub const RETURN_RATE: &str = "ReturnRate";
    pub const RATING: &str = "Rating";

    pub const TOTAL_REVENUE: &str = "TotalRevenue";
    pub const TOTAL_PROFIT: &str = "TotalProfit";
    pub const AVG_ORDER_VALUE: &str = "AvgOrderValue";
    pub const PROFIT_MARGIN: &str = "ProfitMargin";
}

// ── Raw-data explorer ──────────────────────────────────────────────────────
pub mod display {
    use super::order::*;

    pub const COLUMNS: [&str; 13] = [
        ORDER_ID, DATE, CATEGORY, PRODUCT, QUANTITY, UNIT_PRICE, DISCOUNT, REVENUE, PROFIT,
        REGION, CITY, CHANNEL, RATING,
    ];

    pub const ROW_CHOICES: [usize; 4] = [10, 25, 50, 100];
}

/// Calendar order used by the day-of-week view.
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];
