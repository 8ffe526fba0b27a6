use super::ApiError;
use crate::domain::AdId;

pub fn parse_ad_id(raw: &str) -> Result<AdId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::validation(format!("Invalid ad ID: '{}'. Expected a UUID", raw)))
}

pub fn validate_entity_id(resource: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {} ID: {}. ID must be a positive integer",
            resource, id
        )));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ad_id() {
        assert!(parse_ad_id("67e55044-10b1-426f-9247-bb680e5fe0c8").is_ok());
        assert!(parse_ad_id("42").is_err());
        assert!(parse_ad_id("").is_err());
    }

    #[test]
    fn test_validate_entity_id() {
        assert_eq!(validate_entity_id("category", 3).unwrap(), 3);
        assert!(validate_entity_id("category", 0).is_err());
        assert!(validate_entity_id("tag", -4).is_err());
    }
}
