// Shared types used across the codebase

/// Document collections backing the storefront
/// Used by both the store implementations and the resource services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Items,
    Bookings,
    Users,
    Products,
    Reviews,
    Profiles,
    Payments,
}

impl Collection {
    /// Collection name as stored in the database
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Items => "items",
            Collection::Bookings => "bookings",
            Collection::Users => "users",
            Collection::Products => "products",
            Collection::Reviews => "reviews",
            Collection::Profiles => "profiles",
            Collection::Payments => "payments",
        }
    }

    /// Singular label used in client-facing messages
    pub fn label(&self) -> &'static str {
        match self {
            Collection::Items => "item",
            Collection::Bookings => "booking",
            Collection::Users => "user",
            Collection::Products => "product",
            Collection::Reviews => "review",
            Collection::Profiles => "profile",
            Collection::Payments => "payment",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
