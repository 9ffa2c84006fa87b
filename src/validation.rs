//! Request input validation.

use crate::errors::AppError;

/// Maximum accepted address length, in characters.
pub const MAX_ADDRESS_LENGTH: usize = 500;

/// Validate the user-supplied street address.
///
/// Special characters (apostrophes, hyphens, accents) are allowed; only
/// presence, non-emptiness, and length are checked.
pub fn validate_address(address: Option<&str>) -> Result<String, AppError> {
    let address = address
        .ok_or_else(|| AppError::MissingParameter("Address parameter is required".to_string()))?;

    if address.trim().is_empty() {
        return Err(AppError::InvalidAddress(
            "Address cannot be empty".to_string(),
        ));
    }

    if address.chars().count() > MAX_ADDRESS_LENGTH {
        return Err(AppError::InvalidAddress(format!(
            "Address exceeds maximum length of {} characters (provided: {})",
            MAX_ADDRESS_LENGTH,
            address.chars().count()
        )));
    }

    Ok(address.to_string())
}

/// Validate a latitude/longitude pair before any directory call is made.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), AppError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(AppError::InvalidCoordinates(format!(
            "Latitude must be between -90 and 90 (provided: {})",
            latitude
        )));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::InvalidCoordinates(format!(
            "Longitude must be between -180 and 180 (provided: {})",
            longitude
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_address_passes_through() {
        let address = "1600 Pennsylvania Ave NW, Washington, DC 20500";
        assert_eq!(validate_address(Some(address)).unwrap(), address);
    }

    #[test]
    fn test_special_characters_allowed() {
        assert!(validate_address(Some("12 O'Brien-Straße, São Paulo")).is_ok());
    }

    #[test]
    fn test_missing_address_is_missing_parameter() {
        assert!(matches!(
            validate_address(None),
            Err(AppError::MissingParameter(_))
        ));
    }

    #[test]
    fn test_empty_and_whitespace_addresses_rejected() {
        assert!(matches!(
            validate_address(Some("")),
            Err(AppError::InvalidAddress(_))
        ));
        assert!(matches!(
            validate_address(Some("   ")),
            Err(AppError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_overlong_address_rejected() {
        let long = "a".repeat(MAX_ADDRESS_LENGTH + 1);
        assert!(matches!(
            validate_address(Some(&long)),
            Err(AppError::InvalidAddress(_))
        ));

        let exactly_max = "a".repeat(MAX_ADDRESS_LENGTH);
        assert!(validate_address(Some(&exactly_max)).is_ok());
    }

    #[test]
    fn test_coordinate_ranges() {
        assert!(validate_coordinates(47.6105, -122.3115).is_ok());
        assert!(validate_coordinates(-90.0, 180.0).is_ok());
        assert!(validate_coordinates(90.0, -180.0).is_ok());

        assert!(matches!(
            validate_coordinates(91.0, -122.0),
            Err(AppError::InvalidCoordinates(_))
        ));
        assert!(matches!(
            validate_coordinates(-90.5, 0.0),
            Err(AppError::InvalidCoordinates(_))
        ));
        assert!(matches!(
            validate_coordinates(0.0, 181.0),
            Err(AppError::InvalidCoordinates(_))
        ));
        assert!(matches!(
            validate_coordinates(f64::NAN, 0.0),
            Err(AppError::InvalidCoordinates(_))
        ));
    }
}
