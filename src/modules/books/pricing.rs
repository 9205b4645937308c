//! Composable price rules.
//!
//! A rule is either a fixed base price or a depreciation wrapped around
//! another rule, so `Pricing::base(p).depreciated().depreciated()` is two
//! resales' worth of depreciation.

/// Share of the wrapped price kept on each resale.
pub const DEPRECIATION_FACTOR: f64 = 0.9;

#[derive(Debug, Clone, PartialEq)]
pub enum Pricing {
    Base(f64),
    Depreciated(Box<Pricing>),
}

impl Pricing {
    pub fn base(price: f64) -> Self {
        Pricing::Base(price)
    }

    /// Wrap this rule in one round of depreciation.
    pub fn depreciated(self) -> Self {
        Pricing::Depreciated(Box::new(self))
    }

    pub fn price(&self) -> f64 {
        match self {
            Pricing::Base(price) => *price,
            Pricing::Depreciated(inner) => inner.price() * DEPRECIATION_FACTOR,
        }
    }
}

/// Price of a resold copy of a book listed at `price`.
pub fn resale_price(price: f64) -> f64 {
    Pricing::base(price).depreciated().price()
}
