//! Raw entry-form input and its conversion into creation requests.

use crate::model::activity::{ActivityKind, ActivityValidationError, Coordinates, NewActivity};

/// Field values exactly as typed into the entry form.
///
/// Only the input matching `kind` is read; the other one is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSubmission {
    pub kind: String,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation_gain: String,
}

impl FormSubmission {
    /// Builds a creation request located at `coordinates`.
    ///
    /// Numeric text is coerced without validation; the store decides what
    /// is acceptable.
    ///
    /// # Errors
    /// - `UnknownKind` when `kind` is not a supported kind name.
    pub fn to_request(
        &self,
        coordinates: Coordinates,
    ) -> Result<NewActivity, ActivityValidationError> {
        let kind = ActivityKind::parse(&self.kind)
            .ok_or_else(|| ActivityValidationError::UnknownKind(self.kind.clone()))?;
        let distance_km = coerce_number(&self.distance);
        let duration_min = coerce_number(&self.duration);

        Ok(match kind {
            ActivityKind::Paced => NewActivity::paced(
                coordinates,
                distance_km,
                duration_min,
                coerce_number(&self.cadence),
            ),
            ActivityKind::Elevation => NewActivity::elevation(
                coordinates,
                distance_km,
                duration_min,
                coerce_number(&self.elevation_gain),
            ),
        })
    }
}

/// Coerces form text to a number: blank is `0`, unparsable is `NaN`.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::{coerce_number, FormSubmission};
    use crate::model::activity::{ActivityValidationError, Coordinates, NewActivityDetails};

    #[test]
    fn coerce_number_follows_form_rules() {
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("  "), 0.0);
        assert_eq!(coerce_number(" 5.2 "), 5.2);
        assert!(coerce_number("abc").is_nan());
    }

    #[test]
    fn reads_only_the_field_of_the_selected_kind() {
        let submission = FormSubmission {
            kind: "elevation".to_string(),
            distance: "27".to_string(),
            duration: "95".to_string(),
            cadence: "not a number".to_string(),
            elevation_gain: "523".to_string(),
        };

        let request = submission.to_request(Coordinates::new(1.0, 2.0)).unwrap();
        assert_eq!(
            request.details,
            NewActivityDetails::Elevation {
                elevation_gain_m: 523.0
            }
        );
        request.validate().unwrap();
    }

    #[test]
    fn unknown_kind_is_a_validation_error() {
        let submission = FormSubmission {
            kind: "swimming".to_string(),
            ..FormSubmission::default()
        };
        let err = submission
            .to_request(Coordinates::new(0.0, 0.0))
            .unwrap_err();
        assert_eq!(err, ActivityValidationError::UnknownKind("swimming".to_string()));
    }
}
