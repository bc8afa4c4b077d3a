use super::normalizer::clean_fragment;
use super::ExtractionError;
use regex::Regex;
use std::sync::OnceLock;

static UNIT_PATTERN: OnceLock<Regex> = OnceLock::new();

const UNIT_GRAMMAR: &str = concat!(
    r"Residence (?P<unit>[0-9]+) in (?P<building>.+?) on (?P<address>[^,]+), ",
    r"(?P<bedrooms>Studio|[0-9]+ Bedrooms?) (?P<bathrooms>[0-9]+ Bathrooms?), ",
    r"(?P<square_feet>[0-9][0-9,]*) square feet, ",
    r"\$(?P<price>[0-9][0-9,]*), ",
    r"Available (?P<availability>Now|[0-9]{1,2}/[0-9]{1,2}/(?:[0-9]{4}|[0-9]{2}))\b",
);

fn unit_pattern() -> &'static Regex {
    UNIT_PATTERN.get_or_init(|| Regex::new(UNIT_GRAMMAR).expect("unit grammar compiles"))
}

/// Matched text for each field of a listing fragment, before any coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUnitFields {
    pub unit: String,
    pub building: String,
    pub address: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub square_feet: String,
    pub price: String,
    pub availability: String,
}

/// Finds the unit sentence anywhere in `fragment`.
pub fn parse_fragment(fragment: &str) -> Result<RawUnitFields, ExtractionError> {
    let cleaned = clean_fragment(fragment);
    let captures = unit_pattern()
        .captures(&cleaned)
        .ok_or_else(|| ExtractionError::GrammarMismatch {
            fragment: cleaned.clone(),
        })?;

    let group = |name: &str| {
        captures
            .name(name)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    };

    Ok(RawUnitFields {
        unit: group("unit"),
        building: group("building"),
        address: group("address"),
        bedrooms: group("bedrooms"),
        bathrooms: group("bathrooms"),
        square_feet: group("square_feet"),
        price: group("price"),
        availability: group("availability"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARBURY: &str = "Residence 1503 in The Marbury on 28 2nd St, 2 Bedrooms 2 Bathrooms, 1,150 square feet, $4,250, Available Now";

    #[test]
    fn captures_every_group() {
        let fields = parse_fragment(MARBURY).expect("matches");
        assert_eq!(fields.unit, "1503");
        assert_eq!(fields.building, "The Marbury");
        assert_eq!(fields.address, "28 2nd St");
        assert_eq!(fields.bedrooms, "2 Bedrooms");
        assert_eq!(fields.bathrooms, "2 Bathrooms");
        assert_eq!(fields.square_feet, "1,150");
        assert_eq!(fields.price, "4,250");
        assert_eq!(fields.availability, "Now");
    }

    #[test]
    fn searches_inside_surrounding_text() {
        let fragment = format!("View details. {MARBURY}. Schedule a tour");
        let fields = parse_fragment(&fragment).expect("matches");
        assert_eq!(fields.unit, "1503");
        assert_eq!(fields.availability, "Now");
    }

    #[test]
    fn building_stops_at_first_on() {
        let fields = parse_fragment(
            "Residence 7 in Towers on the Hudson on 1 River Dr, Studio 1 Bathroom, 480 square feet, $2,100, Available 3/15/2025",
        )
        .expect("matches");
        assert_eq!(fields.building, "Towers");
        assert_eq!(fields.address, "the Hudson on 1 River Dr");
        assert_eq!(fields.bedrooms, "Studio");
        assert_eq!(fields.availability, "3/15/2025");
    }

    #[test]
    fn html_whitespace_is_collapsed_before_matching() {
        let fragment = "\n  Residence 201 in Liberty Towers\n on 33 Greene St,\n Studio\u{a0}1 Bathroom,  550 square feet, $2,999, Available 9/1/24\n";
        let fields = parse_fragment(fragment).expect("matches");
        assert_eq!(fields.building, "Liberty Towers");
        assert_eq!(fields.bathrooms, "1 Bathroom");
        assert_eq!(fields.availability, "9/1/24");
    }

    #[test]
    fn year_takes_four_digits_when_present() {
        let fields = parse_fragment(
            "Residence 9 in A on B, 1 Bedroom 1 Bathroom, 600 square feet, $1,900, Available 12/31/2024",
        )
        .expect("matches");
        assert_eq!(fields.availability, "12/31/2024");
    }

    #[test]
    fn lowercase_now_and_missing_clauses_do_not_match() {
        let lower = MARBURY.replace("Available Now", "Available now");
        assert!(matches!(
            parse_fragment(&lower),
            Err(ExtractionError::GrammarMismatch { .. })
        ));

        let truncated = "Residence 1503 in The Marbury on 28 2nd St, 2 Bedrooms 2 Bathrooms, 1,150 square feet, $4,250";
        let err = parse_fragment(truncated).expect_err("no availability clause");
        match err {
            ExtractionError::GrammarMismatch { fragment } => assert_eq!(fragment, truncated),
            other => panic!("expected grammar mismatch, got {other:?}"),
        }
    }

    #[test]
    fn non_ascii_digits_do_not_match() {
        let arabic_indic = MARBURY.replace("1,150", "1,1\u{0665}0");
        assert!(matches!(
            parse_fragment(&arabic_indic),
            Err(ExtractionError::GrammarMismatch { .. })
        ));

        let fullwidth_unit = MARBURY.replace("1503", "15\u{ff10}3");
        assert!(matches!(
            parse_fragment(&fullwidth_unit),
            Err(ExtractionError::GrammarMismatch { .. })
        ));
    }
}
