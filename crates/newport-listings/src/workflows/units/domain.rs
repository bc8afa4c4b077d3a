use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

/// Fields of a [`UnitRecord`], in export column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitField {
    BuildingName,
    BuildingAddress,
    ApartmentNumber,
    BedroomCount,
    BathroomCount,
    SquareFootage,
    Price,
    Availability,
}

impl UnitField {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::BuildingName,
            Self::BuildingAddress,
            Self::ApartmentNumber,
            Self::BedroomCount,
            Self::BathroomCount,
            Self::SquareFootage,
            Self::Price,
            Self::Availability,
        ]
    }

    pub const fn column(self) -> &'static str {
        match self {
            Self::BuildingName => "building_name",
            Self::BuildingAddress => "building_address",
            Self::ApartmentNumber => "apartment_number",
            Self::BedroomCount => "bedroom_count",
            Self::BathroomCount => "bathroom_count",
            Self::SquareFootage => "square_footage",
            Self::Price => "price",
            Self::Availability => "availability",
        }
    }
}

impl fmt::Display for UnitField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// When a unit can be moved into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Availability {
    Now,
    On(NaiveDate),
}

impl Availability {
    /// Rendering of [`Availability::Now`] in exported records.
    pub const NOW_SENTINEL: &'static str = "now";
    const DATE_FORMAT: &'static str = "%m/%d/%Y";

    /// Exported form: `now` or a zero-padded `MM/DD/YYYY` date.
    pub fn canonical(&self) -> String {
        match self {
            Self::Now => Self::NOW_SENTINEL.to_string(),
            Self::On(date) => date.format(Self::DATE_FORMAT).to_string(),
        }
    }

    fn sentence_token(&self) -> String {
        match self {
            Self::Now => "Now".to_string(),
            Self::On(date) => date.format(Self::DATE_FORMAT).to_string(),
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl Serialize for Availability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A domain constraint broken by a normalized unit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ConstraintViolation {
    pub field: UnitField,
    pub reason: String,
}

impl ConstraintViolation {
    pub fn new(field: UnitField, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Typed values pulled out of a fragment, not yet checked against the
/// record constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUnit {
    pub building_name: String,
    pub building_address: String,
    pub apartment_number: u32,
    pub bedroom_count: u32,
    pub bathroom_count: u32,
    pub square_footage: u32,
    pub price: u32,
    pub availability: Availability,
}

/// A validated rental unit. Field order matches the export header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitRecord {
    building_name: String,
    building_address: String,
    apartment_number: u32,
    bedroom_count: u32,
    bathroom_count: u32,
    square_footage: u32,
    price: u32,
    availability: Availability,
}

impl UnitRecord {
    pub fn try_new(unit: NormalizedUnit) -> Result<Self, ConstraintViolation> {
        if unit.building_name.trim().is_empty() {
            return Err(ConstraintViolation::new(
                UnitField::BuildingName,
                "must not be empty",
            ));
        }
        if unit.building_address.trim().is_empty() {
            return Err(ConstraintViolation::new(
                UnitField::BuildingAddress,
                "must not be empty",
            ));
        }
        if unit.bathroom_count < 1 {
            return Err(ConstraintViolation::new(
                UnitField::BathroomCount,
                "must be at least 1",
            ));
        }
        if unit.square_footage < 1 {
            return Err(ConstraintViolation::new(
                UnitField::SquareFootage,
                "must be at least 1",
            ));
        }
        if unit.price < 1 {
            return Err(ConstraintViolation::new(
                UnitField::Price,
                "must be at least 1",
            ));
        }

        Ok(Self {
            building_name: unit.building_name,
            building_address: unit.building_address,
            apartment_number: unit.apartment_number,
            bedroom_count: unit.bedroom_count,
            bathroom_count: unit.bathroom_count,
            square_footage: unit.square_footage,
            price: unit.price,
            availability: unit.availability,
        })
    }

    pub fn building_name(&self) -> &str {
        &self.building_name
    }

    pub fn building_address(&self) -> &str {
        &self.building_address
    }

    pub fn apartment_number(&self) -> u32 {
        self.apartment_number
    }

    pub fn bedroom_count(&self) -> u32 {
        self.bedroom_count
    }

    pub fn is_studio(&self) -> bool {
        self.bedroom_count == 0
    }

    pub fn bathroom_count(&self) -> u32 {
        self.bathroom_count
    }

    pub fn square_footage(&self) -> u32 {
        self.square_footage
    }

    pub fn price(&self) -> u32 {
        self.price
    }

    pub fn availability(&self) -> Availability {
        self.availability
    }

    /// Field values as display strings, in export column order.
    pub fn columns(&self) -> [String; 8] {
        [
            self.building_name.clone(),
            self.building_address.clone(),
            self.apartment_number.to_string(),
            self.bedroom_count.to_string(),
            self.bathroom_count.to_string(),
            self.square_footage.to_string(),
            self.price.to_string(),
            self.availability.canonical(),
        ]
    }

    /// Renders the record the way the listing site describes a unit.
    /// Extracting the result yields an equal record when the address has no
    /// comma and the building name has no ` on `. Hand-built records that
    /// break this may fail to extract or read back with different fields.
    pub fn to_sentence(&self) -> String {
        let bedrooms = match self.bedroom_count {
            0 => "Studio".to_string(),
            count => counted(count, "Bedroom"),
        };

        format!(
            "Residence {} in {} on {}, {} {}, {} square feet, ${}, Available {}",
            self.apartment_number,
            self.building_name,
            self.building_address,
            bedrooms,
            counted(self.bathroom_count, "Bathroom"),
            group_thousands(self.square_footage),
            group_thousands(self.price),
            self.availability.sentence_token(),
        )
    }
}

fn counted(count: u32, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
