use serde::{Deserialize, Serialize};
use validator::Validate;

/// Outer box dimensions and material thickness, in the generator's units (mm).
///
/// The range rules only apply when positive dimensions are required by
/// configuration; otherwise values reach the generator untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BoxRequest {
    #[validate(range(exclusive_min = 0.0))]
    pub width: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub height: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub depth: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub thickness: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateBoxResponse {
    /// Path of the artifact relative to the service root, e.g. `output/box_<uuid>.svg`.
    pub svg_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_dimensions_pass_validation() {
        let request = BoxRequest {
            width: 100.0,
            height: 50.0,
            depth: 30.0,
            thickness: 4.0,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn zero_thickness_fails_validation() {
        let request = BoxRequest {
            width: 100.0,
            height: 50.0,
            depth: 30.0,
            thickness: 0.0,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("thickness"));
    }

    #[test]
    fn request_accepts_integer_json_numbers() {
        let request: BoxRequest =
            serde_json::from_str(r#"{"width":100,"height":50,"depth":30,"thickness":4}"#)
                .unwrap();
        assert_eq!(request.width, 100.0);
        assert_eq!(request.depth, 30.0);
    }
}
