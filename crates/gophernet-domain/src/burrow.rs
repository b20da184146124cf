//! Burrow module - the rentable unit of the catalog

use serde::{Deserialize, Serialize};

/// Age in minutes at which a burrow collapses (25 days)
pub const COLLAPSE_AGE_MINUTES: u64 = 25 * 24 * 60;

/// Depth given to an occupied burrow that has not been dug yet
pub const SEED_DEPTH: f64 = 0.01;

/// Fractional depth growth applied to an occupied burrow on every tick
pub const GROWTH_RATE: f64 = 0.009;

/// A burrow - a named underground dwelling
///
/// The serialized form is both the HTTP wire schema and the snapshot
/// file record: `{"name","depth","width","occupied","age"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Burrow {
    /// Unique name, acts as identity within the catalog
    pub name: String,

    /// Depth in meters
    pub depth: f64,

    /// Width in meters (diameter of the circular cross-section)
    pub width: f64,

    /// Whether the burrow has been rented. Never reverts to false.
    pub occupied: bool,

    /// Minutes since creation
    pub age: u64,
}

impl Burrow {
    /// Create a new burrow
    ///
    /// # Examples
    ///
    /// ```
    /// use gophernet_domain::Burrow;
    ///
    /// let burrow = Burrow::new("Burrow1", 1.5, 1.0, false, 100);
    /// assert_eq!(burrow.name, "Burrow1");
    /// assert!(!burrow.has_collapsed());
    /// ```
    pub fn new(name: impl Into<String>, depth: f64, width: f64, occupied: bool, age: u64) -> Self {
        Self {
            name: name.into(),
            depth,
            width,
            occupied,
            age,
        }
    }

    /// Advance the burrow by one minute
    ///
    /// Age always increases by one. An occupied burrow also deepens: a
    /// zero-depth burrow is seeded to [`SEED_DEPTH`], any other grows by
    /// [`GROWTH_RATE`] of its current depth.
    ///
    /// # Examples
    ///
    /// ```
    /// use gophernet_domain::Burrow;
    ///
    /// let mut burrow = Burrow::new("B", 0.0, 1.0, true, 0);
    /// burrow.tick();
    /// assert_eq!(burrow.depth, 0.01);
    /// assert_eq!(burrow.age, 1);
    /// ```
    pub fn tick(&mut self) {
        if self.occupied {
            if self.depth == 0.0 {
                self.depth = SEED_DEPTH;
            } else {
                self.depth += self.depth * GROWTH_RATE;
            }
        }

        self.age = self.age.saturating_add(1);
    }

    /// Whether the burrow has reached [`COLLAPSE_AGE_MINUTES`]
    pub fn has_collapsed(&self) -> bool {
        self.age >= COLLAPSE_AGE_MINUTES
    }

    /// Whether the burrow can be rented right now
    pub fn is_available(&self) -> bool {
        !self.occupied && !self.has_collapsed()
    }

    /// Cylinder volume in cubic meters, treating width as the diameter
    pub fn volume(&self) -> f64 {
        let radius = self.width / 2.0;
        std::f64::consts::PI * radius * radius * self.depth
    }
}
