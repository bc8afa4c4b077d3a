use super::domain::{Availability, ConstraintViolation, NormalizedUnit, UnitField};
use super::parser::RawUnitFields;
use chrono::NaiveDate;

const STUDIO: &str = "Studio";
const AVAILABLE_NOW: &str = "Now";

/// Strips invisible characters and collapses whitespace runs, so text
/// content and accessibility labels read the same.
pub(crate) fn clean_fragment(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Coerces matched text into typed unit values.
pub fn normalize(fields: &RawUnitFields) -> Result<NormalizedUnit, ConstraintViolation> {
    Ok(NormalizedUnit {
        building_name: fields.building.trim().to_string(),
        building_address: fields.address.trim().to_string(),
        apartment_number: parse_whole(&fields.unit, UnitField::ApartmentNumber)?,
        bedroom_count: parse_bedrooms(&fields.bedrooms)?,
        bathroom_count: parse_leading_count(&fields.bathrooms, UnitField::BathroomCount)?,
        square_footage: parse_grouped(&fields.square_feet, UnitField::SquareFootage)?,
        price: parse_grouped(&fields.price, UnitField::Price)?,
        availability: parse_availability(&fields.availability)?,
    })
}

fn parse_bedrooms(spec: &str) -> Result<u32, ConstraintViolation> {
    if spec.trim() == STUDIO {
        return Ok(0);
    }
    parse_leading_count(spec, UnitField::BedroomCount)
}

fn parse_leading_count(spec: &str, field: UnitField) -> Result<u32, ConstraintViolation> {
    let token = spec.split_whitespace().next().unwrap_or_default();
    parse_whole(token, field)
}

fn parse_grouped(raw: &str, field: UnitField) -> Result<u32, ConstraintViolation> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    parse_whole(&digits, field)
}

fn parse_whole(raw: &str, field: UnitField) -> Result<u32, ConstraintViolation> {
    raw.trim().parse::<u32>().map_err(|err| {
        ConstraintViolation::new(field, format!("'{raw}' is not a whole number ({err})"))
    })
}

pub(crate) fn parse_availability(raw: &str) -> Result<Availability, ConstraintViolation> {
    let raw = raw.trim();
    if raw == AVAILABLE_NOW {
        return Ok(Availability::Now);
    }

    let invalid = |reason: &str| {
        ConstraintViolation::new(UnitField::Availability, format!("'{raw}' {reason}"))
    };

    let parts: Vec<&str> = raw.split('/').collect();
    let [month, day, year] = parts.as_slice() else {
        return Err(invalid("is not a month/day/year date"));
    };

    let month = month
        .parse::<u32>()
        .map_err(|_| invalid("has a non-numeric month"))?;
    let day = day
        .parse::<u32>()
        .map_err(|_| invalid("has a non-numeric day"))?;
    let year = match year.len() {
        2 => 2000 + year.parse::<i32>().map_err(|_| invalid("has a non-numeric year"))?,
        4 => year
            .parse::<i32>()
            .map_err(|_| invalid("has a non-numeric year"))?,
        _ => return Err(invalid("needs a 2 or 4 digit year")),
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .map(Availability::On)
        .ok_or_else(|| invalid("is not a calendar date"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(bedrooms: &str, bathrooms: &str, availability: &str) -> RawUnitFields {
        RawUnitFields {
            unit: "201".to_string(),
            building: "Liberty Towers".to_string(),
            address: "33 Greene St".to_string(),
            bedrooms: bedrooms.to_string(),
            bathrooms: bathrooms.to_string(),
            square_feet: "1,150".to_string(),
            price: "12,999".to_string(),
            availability: availability.to_string(),
        }
    }

    fn date(year: i32, month: u32, day: u32) -> Availability {
        Availability::On(NaiveDate::from_ymd_opt(year, month, day).expect("valid date"))
    }

    #[test]
    fn clean_fragment_removes_invisible_characters() {
        let cleaned = clean_fragment("\u{feff}Residence  12\n\tin\u{200b} Tower ");
        assert_eq!(cleaned, "Residence 12 in Tower");
    }

    #[test]
    fn studio_maps_to_zero_bedrooms() {
        let unit = normalize(&raw("Studio", "1 Bathroom", "Now")).expect("normalizes");
        assert_eq!(unit.bedroom_count, 0);
        assert_eq!(unit.bathroom_count, 1);
    }

    #[test]
    fn counts_take_leading_integer() {
        let unit = normalize(&raw("3 Bedrooms", "2 Bathrooms", "Now")).expect("normalizes");
        assert_eq!(unit.bedroom_count, 3);
        assert_eq!(unit.bathroom_count, 2);
        assert_eq!(unit.square_footage, 1150);
        assert_eq!(unit.price, 12999);
        assert_eq!(unit.apartment_number, 201);
    }

    #[test]
    fn availability_dates_collapse_to_four_digit_years() {
        assert_eq!(parse_availability("Now").expect("now"), Availability::Now);
        assert_eq!(parse_availability("12/5/24").expect("date"), date(2024, 12, 5));
        assert_eq!(parse_availability("1/1/2025").expect("date"), date(2025, 1, 1));
        assert_eq!(
            parse_availability("9/1/24").expect("short"),
            parse_availability("09/01/2024").expect("long")
        );
        assert_eq!(
            parse_availability("12/5/24").expect("date").canonical(),
            "12/05/2024"
        );
    }

    #[test]
    fn impossible_dates_are_rejected() {
        let err = parse_availability("2/30/2025").expect_err("no such date");
        assert_eq!(err.field, UnitField::Availability);
        assert!(parse_availability("13/1/24").is_err());
        assert!(parse_availability("1/1/202").is_err());
    }

    #[test]
    fn oversized_numbers_are_rejected() {
        let mut fields = raw("1 Bedroom", "1 Bathroom", "Now");
        fields.price = "99,999,999,999".to_string();
        let err = normalize(&fields).expect_err("overflow");
        assert_eq!(err.field, UnitField::Price);
    }
}
