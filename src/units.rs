//! Typed quantities for the energy tables.
//!
//! All energy magnitudes in the EIA tables are given in billion Btu. Shares are dimensionless.

/// Represents a dimensionless quantity, such as the renewable share of a total.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, derive_more::Add, derive_more::Sub)]
pub struct Dimensionless(pub f64);

impl Dimensionless {
    /// Restrict the value to the closed unit interval
    pub fn clamp_unit(self) -> Self {
        Self(self.0.clamp(0.0, 1.0))
    }

    /// Returns the value as a f64.
    pub fn value(self) -> f64 {
        self.0
    }
}

macro_rules! unit_struct {
    ($name:ident) => {
        /// Represents a type of quantity.
        #[derive(
            Debug, Clone, Copy, PartialEq, PartialOrd, Default, derive_more::Add, derive_more::Sub,
        )]
        pub struct $name(pub f64);

        impl $name {
            /// Returns the value of the unit type as a f64.
            pub fn value(self) -> f64 {
                self.0
            }
        }

        impl std::ops::Div for $name {
            type Output = Dimensionless;
            fn div(self, rhs: $name) -> Dimensionless {
                Dimensionless(self.0 / rhs.0)
            }
        }

        impl std::iter::Sum for $name {
            fn sum<I: Iterator<Item = $name>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }
    };
}

// Billion Btu
unit_struct!(Energy);
