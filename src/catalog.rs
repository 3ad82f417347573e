//! Static reference data for the synthetic retail dataset.
//!
//! Every generated order draws its categorical attributes from these tables,
//! so they double as the membership rules checked by the tests
//! (a product belongs to its category, a city to its region).

/// A product category with its catalogue, unit price range and sampling weight.
#[derive(Debug, Clone, Copy)]
pub struct CategorySpec {
    pub name: &'static str,
    pub products: &'static [&'static str],
    /// Half-open `[low, high)` unit price range.
    pub price_range: (f64, f64),
    pub weight: f64,
}

/// A sales region and the cities that belong to it.
#[derive(Debug, Clone, Copy)]
pub struct RegionSpec {
    pub name: &'static str,
    pub cities: &'static [&'static str],
}

pub const CATEGORIES: [CategorySpec; 6] = [
    CategorySpec {
        name: "Electronics",
        products: &["Laptop", "Smartphone", "Tablet", "Headphones", "Smartwatch"],
        price_range: (150.0, 1200.0),
        weight: 0.25,
    },
    CategorySpec {
        name: "Clothing",
        products: &["T-Shirt", "Jeans", "Jacket", "Dress", "Shoes"],
        price_range: (20.0, 200.0),
        weight: 0.20,
    },
    CategorySpec {
        name: "Home & Living",
        products: &["Sofa", "Lamp", "Bedsheet", "Curtains", "Cookware"],
        price_range: (30.0, 800.0),
        weight: 0.15,
    },
    CategorySpec {
        name: "Books",
        products: &["Fiction", "Non-Fiction", "Textbook", "Comic", "Biography"],
        price_range: (10.0, 80.0),
        weight: 0.10,
    },
    CategorySpec {
        name: "Sports",
        products: &["Yoga Mat", "Dumbbells", "Cycle", "Tennis Racket", "Shoes"],
        price_range: (25.0, 500.0),
        weight: 0.15,
    },
    CategorySpec {
        name: "Beauty",
        products: &["Perfume", "Skincare Kit", "Lipstick", "Hair Dryer", "Serum"],
        price_range: (15.0, 250.0),
        weight: 0.15,
    },
];

pub const REGIONS: [RegionSpec; 5] = [
    RegionSpec {
        name: "North",
        cities: &["Delhi", "Chandigarh", "Amritsar"],
    },
    RegionSpec {
        name: "South",
        cities: &["Bangalore", "Chennai", "Hyderabad"],
    },
    RegionSpec {
        name: "East",
        cities: &["Kolkata", "Bhubaneswar", "Patna"],
    },
    RegionSpec {
        name: "West",
        cities: &["Mumbai", "Pune", "Ahmedabad"],
    },
    RegionSpec {
        name: "Central",
        cities: &["Bhopal", "Indore", "Nagpur"],
    },
];

pub const CHANNELS: [(&str, f64); 4] = [
    ("Website", 0.35),
    ("Mobile App", 0.30),
    ("Marketplace", 0.25),
    ("Direct", 0.10),
];

pub const PAYMENT_METHODS: [(&str, f64); 5] = [
    ("Credit Card", 0.25),
    ("Debit Card", 0.20),
    ("UPI", 0.30),
    ("Net Banking", 0.10),
    ("COD", 0.15),
];

pub const QUANTITIES: [(i64, f64); 3] = [(1, 0.70), (2, 0.25), (3, 0.05)];

/// Discount percentages. Always one of these values.
pub const DISCOUNTS: [(i64, f64); 6] = [
    (0, 0.30),
    (5, 0.20),
    (10, 0.20),
    (15, 0.15),
    (20, 0.10),
    (25, 0.05),
];

pub const RATINGS: [(f64, f64); 5] = [
    (3.0, 0.05),
    (3.5, 0.10),
    (4.0, 0.30),
    (4.5, 0.35),
    (5.0, 0.20),
];

pub const RETURN_PROBABILITY: f64 = 0.08;

/// Profit is revenue times a margin drawn uniformly from this range.
pub const MARGIN_RANGE: (f64, f64) = (0.15, 0.40);

/// Months whose draws get a second chance at landing elsewhere.
pub const FESTIVE_MONTHS: [u32; 3] = [10, 11, 12];

pub fn category(name: &str) -> Option<&'static CategorySpec> {
    CATEGORIES.iter().find(|c| c.name == name)
}

pub fn region(name: &str) -> Option<&'static RegionSpec> {
    REGIONS.iter().find(|r| r.name == name)
}

pub fn product_in_category(category_name: &str, product: &str) -> bool {
    category(category_name).is_some_and(|c| c.products.contains(&product))
}

pub fn city_in_region(region_name: &str, city: &str) -> bool {
    region(region_name).is_some_and(|r| r.cities.contains(&city))
}
